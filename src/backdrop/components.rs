//! Bevy component definitions
//!
//! This module contains all component markers and data structures used
//! to tag and identify entities in the Bevy ECS (Entity Component System).

use bevy::prelude::*;

/// Marker for every entity created at mount
///
/// Teardown despawns all entities carrying it, so nothing spawned by the
/// backdrop outlives the mounted state.
#[derive(Component)]
pub struct BackdropObject;

/// Marker component for the offscreen rendering camera
///
/// Entities with this component are cameras that render to the drawing
/// surface instead of a window.
#[derive(Component)]
pub struct OffscreenCamera;

/// Cameras that ease toward the pointer-derived target every frame
#[derive(Component)]
pub struct PointerFollower;

/// Constant per-frame rotation, accumulated as XYZ Euler angles
#[derive(Component, Debug, Clone, Copy)]
pub struct Spin {
    /// Accumulated angles (radians)
    pub angles: Vec3,
    /// Increment applied every frame (radians)
    pub step: Vec3,
}

impl Spin {
    pub fn new(angles: Vec3, step: Vec3) -> Self {
        Self { angles, step }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.angles.x, self.angles.y, self.angles.z)
    }
}

/// The wireframe dodecahedron
#[derive(Component)]
pub struct Polyhedron;

/// The cloud of dots
#[derive(Component)]
pub struct ParticleField {
    pub count: usize,
}

/// The rippling line grid
///
/// Keeps the original planar coordinates of every vertex; the ripple
/// recomputes z from these, never from the displaced positions.
#[derive(Component)]
pub struct LineGrid {
    pub planar: Vec<Vec2>,
}
