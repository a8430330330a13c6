//! Bevy systems
//!
//! This module contains all the systems that operate on entities
//! and resources in the Bevy ECS.

pub mod scene;
pub mod camera;
pub mod animation;
pub mod viewport;
pub mod host_sync;
pub mod frame_extraction;

pub use scene::{mount_backdrop, teardown_backdrop};
pub use camera::{follow_pointer, sync_camera_activity};
pub use animation::{count_frame, ripple_grid, spin_objects};
pub use viewport::apply_viewport_resize;
pub use host_sync::{publish_stats, schedule_next_frame, sync_host_requests};
pub use frame_extraction::extract_and_publish_frame;
