//! Bevy engine integration
//!
//! This module contains all Bevy-related code including components,
//! resources, geometry, systems, plugins, and application setup.

pub mod components;
pub mod resources;
pub mod geometry;
pub mod plugins;
pub mod systems;
pub mod app;

// Re-export commonly used items
pub use app::{create_app, start_backdrop};
pub use plugins::{BackdropPlugin, BackdropSystems, SurfaceReadbackPlugin};
pub use resources::{BackdropState, FrameLoop, LoopPhase, ParticleSeed, ResourceLedger};
