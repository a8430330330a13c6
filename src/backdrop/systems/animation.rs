//! Animation systems
//!
//! This module contains systems that animate entities in the scene. All
//! increments are per frame, not per elapsed second.

use std::f32::consts::TAU;

use bevy::{prelude::*, time::Real};

use crate::backdrop::components::{LineGrid, Spin};
use crate::backdrop::geometry::rippled_positions;
use crate::backdrop::resources::FrameLoop;
use crate::config::animation::RIPPLE_TIME_SCALE;

/// Advance every spinning object by its fixed step
pub fn spin_objects(mut query: Query<(&mut Spin, &mut Transform)>) {
    for (mut spin, mut transform) in query.iter_mut() {
        let step = spin.step;
        spin.angles = (spin.angles + step).map(|a| a.rem_euclid(TAU));
        transform.rotation = spin.rotation();
    }
}

/// Ripple clock: wall-clock milliseconds scaled down
pub fn ripple_time(elapsed_secs: f64) -> f32 {
    (elapsed_secs * 1000.0 * RIPPLE_TIME_SCALE) as f32
}

/// Recompute grid vertex heights from their planar coordinates
pub fn ripple_grid(
    time: Res<Time<Real>>,
    grids: Query<(&LineGrid, &Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let t = ripple_time(time.elapsed_secs_f64());
    for (grid, mesh3d) in grids.iter() {
        // Mesh already released: nothing to update
        let Some(mut mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, rippled_positions(&grid.planar, t));
    }
}

/// Count the frame that just ran
pub fn count_frame(mut frame_loop: ResMut<FrameLoop>) {
    frame_loop.record_frame();
}
