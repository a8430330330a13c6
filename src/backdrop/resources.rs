//! Bevy resource definitions
//!
//! This module contains all global resources used by Bevy systems.
//! Resources are singleton data that can be accessed by any system.

use bevy::prelude::*;

use crate::tauri_bridge::{BackdropHost, PointerPosition, ViewportSize};

// =============================================================================
// Lifecycle
// =============================================================================

/// Whether the backdrop is attached to the page
#[derive(States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackdropState {
    #[default]
    Unmounted,
    Mounted,
}

/// Phase of the self-scheduling frame loop
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// No frame scheduled
    #[default]
    Idle,
    /// A frame is scheduled for the next tick
    Armed,
    /// Every tick is a frame
    Running,
}

/// Explicit start/stop control over the per-frame update
#[derive(Resource, Default, Debug)]
pub struct FrameLoop {
    phase: LoopPhase,
    frames_run: u64,
}

impl FrameLoop {
    /// Arm continuous scheduling; the first frame runs on the next tick
    pub fn start(&mut self) {
        if self.phase == LoopPhase::Idle {
            self.phase = LoopPhase::Armed;
        }
    }

    /// Cancel; safe when nothing is scheduled
    pub fn stop(&mut self) {
        self.phase = LoopPhase::Idle;
    }

    /// End of tick: an armed loop becomes running
    pub fn schedule_next(&mut self) {
        if self.phase == LoopPhase::Armed {
            self.phase = LoopPhase::Running;
        }
    }

    pub fn record_frame(&mut self) {
        self.frames_run += 1;
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == LoopPhase::Running
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}

// =============================================================================
// Input
// =============================================================================

/// Pointer position as last pushed by the host
#[derive(Resource, Default, Debug, Clone, Copy, Deref, DerefMut)]
pub struct CurrentPointer(pub PointerPosition);

/// Viewport size and a resize waiting for the next frame
#[derive(Resource, Default, Debug)]
pub struct Viewport {
    pub size: ViewportSize,
    pub pending: Option<ViewportSize>,
}

/// Handle back to the host's shared state
#[derive(Resource, Clone, Deref)]
pub struct HostLink(pub BackdropHost);

// =============================================================================
// Scene Resources
// =============================================================================

/// Graphics resources acquired at mount, released exactly once at teardown
#[derive(Resource, Default)]
pub struct SceneResources {
    pub meshes: Vec<Handle<Mesh>>,
    pub materials: Vec<Handle<StandardMaterial>>,
    pub surface: Option<Handle<Image>>,
}

impl SceneResources {
    pub fn len(&self) -> usize {
        self.meshes.len() + self.materials.len() + usize::from(self.surface.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Running totals of acquired and released graphics resources
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLedger {
    pub acquired: usize,
    pub released: usize,
}

impl ResourceLedger {
    pub fn outstanding(&self) -> usize {
        self.acquired - self.released
    }
}

/// Fixed seed for the particle field; `None` draws from entropy
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct ParticleSeed(pub Option<u64>);

// =============================================================================
// Channel Communication (Main World <-> Render World)
// =============================================================================

use crossbeam_channel::{Receiver, Sender};

/// Padded pixel rows copied out of the surface texture
pub struct CopiedFrame {
    pub width: u32,
    pub height: u32,
    pub padded_rgba: Vec<u8>,
}

/// Receives data from render world
#[derive(Resource, Deref)]
pub struct MainWorldReceiver(pub Receiver<CopiedFrame>);

/// Sends data to main world
#[derive(Resource, Deref)]
pub struct RenderWorldSender(pub Sender<CopiedFrame>);

/// Counters for published frames
#[derive(Resource, Default)]
pub struct PublishStats {
    pub frames_published: u64,
    pub last_log_time: f64,
}
