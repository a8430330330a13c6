//! The backdrop plugin: states, resources and the frame schedule
//!
//! Works without any rendering backend, which is how the tests drive it.

use bevy::prelude::*;

use crate::backdrop::resources::{
    BackdropState, CurrentPointer, FrameLoop, HostLink, ParticleSeed, ResourceLedger, Viewport,
};
use crate::backdrop::systems::*;
use crate::tauri_bridge::BackdropHost;

/// Ordering of the per-tick work
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BackdropSystems {
    /// Resize handling, runs whenever a resize is pending
    Viewport,
    /// The frame: animation and camera follow, only while the loop runs
    Frame,
}

/// Run condition: the frame loop is running
pub fn frame_loop_running(frame_loop: Res<FrameLoop>) -> bool {
    frame_loop.is_running()
}

pub struct BackdropPlugin {
    host: BackdropHost,
}

impl BackdropPlugin {
    pub fn new(host: BackdropHost) -> Self {
        Self { host }
    }
}

impl Plugin for BackdropPlugin {
    fn build(&self, app: &mut App) {
        let size = self.host.viewport().unwrap_or_else(|e| {
            warn!("[Backdrop] Using default viewport: {e}");
            Default::default()
        });

        app.init_state::<BackdropState>()
            .insert_resource(HostLink(self.host.clone()))
            .insert_resource(Viewport {
                size,
                pending: None,
            })
            .init_resource::<FrameLoop>()
            .init_resource::<CurrentPointer>()
            .init_resource::<ResourceLedger>()
            .init_resource::<ParticleSeed>();

        app.configure_sets(
            Update,
            BackdropSystems::Frame
                .after(BackdropSystems::Viewport)
                .run_if(in_state(BackdropState::Mounted).and(frame_loop_running)),
        );

        app.add_systems(PreUpdate, sync_host_requests)
            .add_systems(OnEnter(BackdropState::Mounted), mount_backdrop)
            .add_systems(OnExit(BackdropState::Mounted), teardown_backdrop)
            .add_systems(Update, apply_viewport_resize.in_set(BackdropSystems::Viewport))
            .add_systems(
                Update,
                (spin_objects, ripple_grid, follow_pointer, count_frame)
                    .chain()
                    .in_set(BackdropSystems::Frame),
            )
            .add_systems(PostUpdate, sync_camera_activity)
            .add_systems(Last, (schedule_next_frame, publish_stats).chain());
    }
}
