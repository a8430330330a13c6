//! Camera control system
//!
//! This module implements the pointer-follow camera: every frame the camera
//! covers a fixed fraction of the remaining distance to a target derived from
//! the pointer, then re-aims at the origin.

use bevy::{
    math::{Vec2, Vec3},
    prelude::*,
};

use crate::backdrop::components::{OffscreenCamera, PointerFollower};
use crate::backdrop::resources::{CurrentPointer, FrameLoop};
use crate::config::camera::{FOLLOW_EASING, FOLLOW_RANGE};
use crate::tauri_bridge::PointerPosition;

/// Camera target in the xy plane for a normalized pointer
pub fn follow_target(pointer: PointerPosition) -> Vec2 {
    Vec2::new(pointer.x, pointer.y) * FOLLOW_RANGE
}

/// Move `factor` of the remaining distance toward `target`
pub fn ease_toward(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    current + (target - current) * factor
}

/// Ease following cameras toward the pointer target and look at the origin
pub fn follow_pointer(
    pointer: Res<CurrentPointer>,
    mut camera_query: Query<&mut Transform, With<PointerFollower>>,
) {
    let target = follow_target(pointer.0);
    for mut transform in camera_query.iter_mut() {
        let eased = ease_toward(transform.translation.truncate(), target, FOLLOW_EASING);
        transform.translation.x = eased.x;
        transform.translation.y = eased.y;
        transform.look_at(Vec3::ZERO, Vec3::Y);
    }
}

/// Only render while the frame loop is running
pub fn sync_camera_activity(
    frame_loop: Res<FrameLoop>,
    mut camera_query: Query<&mut Camera, With<OffscreenCamera>>,
) {
    let running = frame_loop.is_running();
    for mut camera in camera_query.iter_mut() {
        if camera.is_active != running {
            camera.is_active = running;
        }
    }
}
