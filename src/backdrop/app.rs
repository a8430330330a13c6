//! Bevy application setup and execution
//!
//! This module handles the creation and configuration of the Bevy app,
//! including plugin registration, and runs it on its own thread.

use bevy::{
    app::{App, ScheduleRunnerPlugin},
    prelude::*,
    window::ExitCondition,
};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::backdrop::plugins::{BackdropPlugin, SurfaceReadbackPlugin};
use crate::config::TARGET_FPS;
use crate::error::Result;
use crate::tauri_bridge::{BackdropHost, SharedStats};

/// Create and configure the headless Bevy application
pub fn create_app(host: BackdropHost) -> App {
    let mut app = App::new();

    // Use DefaultPlugins but configure for headless operation
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: None,
                exit_condition: ExitCondition::DontExit,
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );

    // One tick per display refresh
    app.add_plugins(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
        1.0 / TARGET_FPS,
    )));

    app.add_plugins(BackdropPlugin::new(host));
    app.add_plugins(SurfaceReadbackPlugin);

    info!("[Backdrop] App configured (headless, offscreen surface)");
    app
}

/// Start the backdrop in a background thread
///
/// Building the app panics when no graphics adapter exists. That is caught
/// here: the page keeps working and simply shows no background.
pub fn start_backdrop(host: BackdropHost) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("backdrop-render".into())
        .spawn(move || {
            let stats = host.stats.clone();
            let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
                let mut app = create_app(host);
                info!("[Backdrop] Running render loop...");
                app.run()
            }));

            match outcome {
                Ok(exit) => info!("[Backdrop] Render loop exited: {exit:?}"),
                Err(_) => {
                    error!("[Backdrop] Renderer failed; continuing without background");
                    record_renderer_failure(&stats);
                }
            }
        })?;
    Ok(handle)
}

/// Report a dead renderer: no graphics, nothing mounted, no frames
fn record_renderer_failure(stats: &SharedStats) {
    let result = stats.update(|s| {
        s.graphics_available = false;
        s.mounted = false;
        s.frame_loop_running = false;
    });
    if let Err(e) = result {
        warn!("[Backdrop] Could not record renderer failure: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_failure_clears_running_flags() {
        let stats = SharedStats::default();
        stats
            .update(|s| {
                s.graphics_available = true;
                s.mounted = true;
                s.frame_loop_running = true;
            })
            .unwrap();

        record_renderer_failure(&stats);

        let snapshot = stats.snapshot().unwrap();
        assert!(!snapshot.graphics_available);
        assert!(!snapshot.mounted);
        assert!(!snapshot.frame_loop_running);
    }
}
