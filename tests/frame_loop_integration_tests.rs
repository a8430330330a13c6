//! Per-frame behaviour: camera follow, rotation, ripple, start/stop

mod common;

use bevy::prelude::*;
use common::*;
use hero_backdrop_lib::backdrop::components::{
    LineGrid, OffscreenCamera, ParticleField, Polyhedron, Spin,
};
use hero_backdrop_lib::backdrop::{FrameLoop, LoopPhase};

fn spin_of<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> Spin {
    let mut query = app.world_mut().query_filtered::<&Spin, F>();
    *query.single(app.world()).unwrap()
}

#[test]
fn first_frame_runs_on_the_tick_after_mount() {
    let host = host_800x600();
    let mut app = mounted_app(&host);
    assert_eq!(frames_run(&app), 0);
    assert_eq!(app.world().resource::<FrameLoop>().phase(), LoopPhase::Running);

    app.update();
    assert_eq!(frames_run(&app), 1);
}

#[test]
fn centred_pointer_keeps_camera_centred() {
    let host = host_800x600();
    let mut app = mounted_app(&host);
    host.set_pointer(0.0, 0.0).unwrap();

    run_frames(&mut app, 100);

    let transform = camera_transform(&mut app);
    assert_eq!(transform.translation.x, 0.0);
    assert_eq!(transform.translation.y, 0.0);
    assert_eq!(transform.translation.z, 5.0);
}

#[test]
fn camera_converges_geometrically_toward_pointer_target() {
    let host = host_800x600();
    let mut app = mounted_app(&host);
    host.set_pointer(1.0, 1.0).unwrap();

    let target = Vec2::new(0.5, 0.5);
    let mut previous = camera_transform(&mut app).translation.truncate().distance(target);
    for _ in 0..50 {
        app.update();
        let distance = camera_transform(&mut app).translation.truncate().distance(target);
        assert!(distance <= previous * 0.95 + 1e-6);
        previous = distance;
    }

    assert_eq!(frames_run(&app), 50);
    let position = camera_transform(&mut app).translation;
    let bound = 0.5 * 0.95f32.powi(50) + 1e-5;
    assert!((position.x - 0.5).abs() <= bound, "x = {}", position.x);
    assert!((position.y - 0.5).abs() <= bound, "y = {}", position.y);
    assert_eq!(position.z, 5.0);
}

#[test]
fn camera_keeps_looking_at_the_origin() {
    let host = host_800x600();
    let mut app = mounted_app(&host);
    host.set_pointer(-1.0, 0.5).unwrap();
    run_frames(&mut app, 20);

    let transform = camera_transform(&mut app);
    let to_origin = (-transform.translation).normalize();
    assert!(transform.forward().dot(to_origin) > 0.9999);
}

#[test]
fn rotations_advance_by_their_own_fixed_step() {
    let host = host_800x600();
    let mut app = mounted_app(&host);

    let mut polyhedron = spin_of::<With<Polyhedron>>(&mut app);
    let mut particles = spin_of::<With<ParticleField>>(&mut app);
    let mut grid = spin_of::<With<LineGrid>>(&mut app);

    for _ in 0..10 {
        app.update();
        let p = spin_of::<With<Polyhedron>>(&mut app);
        let f = spin_of::<With<ParticleField>>(&mut app);
        let g = spin_of::<With<LineGrid>>(&mut app);

        assert!(p.angles.x > polyhedron.angles.x && p.angles.y > polyhedron.angles.y);
        assert!((p.angles.x - polyhedron.angles.x - 0.001).abs() < 1e-6);
        assert!((p.angles.y - polyhedron.angles.y - 0.001).abs() < 1e-6);
        assert!(f.angles.y > particles.angles.y);
        assert!((f.angles.y - particles.angles.y - 0.0001).abs() < 1e-6);
        assert!(g.angles.y > grid.angles.y);
        assert!((g.angles.y - grid.angles.y - 0.00005).abs() < 1e-6);
        // The grid stays laid flat
        assert!((g.angles.x - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        polyhedron = p;
        particles = f;
        grid = g;
    }
}

#[test]
fn grid_ripple_stays_within_amplitude() {
    let host = host_800x600();
    let mut app = mounted_app(&host);
    run_frames(&mut app, 5);

    let mut grids = app.world_mut().query::<(&LineGrid, &Mesh3d)>();
    let (grid, mesh3d) = grids.single(app.world()).unwrap();
    let mesh = app.world().resource::<Assets<Mesh>>().get(&mesh3d.0).unwrap();
    let positions = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(|values| values.as_float3())
        .unwrap();

    assert_eq!(positions.len(), grid.planar.len());
    for (position, planar) in positions.iter().zip(&grid.planar) {
        assert_eq!(position[0], planar.x);
        assert_eq!(position[1], planar.y);
        assert!(position[2].abs() <= 0.4 + 1e-6);
    }
}

#[test]
fn stop_guarantees_no_further_frames() {
    let host = host_800x600();
    let mut app = mounted_app(&host);
    run_frames(&mut app, 5);
    let before = spin_of::<With<Polyhedron>>(&mut app);

    host.stop().unwrap();
    run_frames(&mut app, 3);

    assert_eq!(frames_run(&app), 5);
    assert_eq!(spin_of::<With<Polyhedron>>(&mut app).angles, before.angles);
    let mut cameras = app
        .world_mut()
        .query_filtered::<&Camera, With<OffscreenCamera>>();
    assert!(!cameras.single(app.world()).unwrap().is_active);
}

#[test]
fn stop_is_idempotent_and_start_resumes_on_the_following_tick() {
    let host = host_800x600();
    let mut app = mounted_app(&host);
    run_frames(&mut app, 2);

    host.stop().unwrap();
    host.stop().unwrap();
    app.update();
    assert_eq!(app.world().resource::<FrameLoop>().phase(), LoopPhase::Idle);

    host.start().unwrap();
    app.update();
    // Armed this tick, first resumed frame on the next
    assert_eq!(frames_run(&app), 2);

    app.update();
    assert_eq!(frames_run(&app), 3);
    let mut cameras = app
        .world_mut()
        .query_filtered::<&Camera, With<OffscreenCamera>>();
    assert!(cameras.single(app.world()).unwrap().is_active);
}

#[test]
fn pointer_events_in_client_pixels_steer_the_camera() {
    let host = host_800x600();
    let mut app = mounted_app(&host);
    // Top-right corner
    host.pointer_moved(800.0, 0.0).unwrap();
    run_frames(&mut app, 200);

    let position = camera_transform(&mut app).translation;
    assert!((position.x - 0.5).abs() < 1e-3);
    assert!((position.y - 0.5).abs() < 1e-3);
}
