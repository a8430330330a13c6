//! Scene setup and teardown systems
//!
//! Mount builds the drawing surface, camera, decorative objects and lights;
//! teardown releases every graphics resource mount acquired, exactly once.

use std::f32::consts::FRAC_PI_2;

use bevy::{
    asset::Assets,
    camera::RenderTarget,
    core_pipeline::tonemapping::Tonemapping,
    image::Image,
    prelude::*,
    render::render_resource::{TextureFormat, TextureUsages},
};
use rand::{rngs::StdRng, SeedableRng};

use crate::backdrop::components::{
    BackdropObject, LineGrid, OffscreenCamera, ParticleField, PointerFollower, Polyhedron, Spin,
};
use crate::backdrop::geometry::{
    grid_lines, grid_mesh, particle_mesh, particle_positions, polyhedron_mesh,
};
use crate::backdrop::resources::{
    FrameLoop, HostLink, ParticleSeed, ResourceLedger, SceneResources, Viewport,
};
use crate::config::{animation::*, camera, scene::*};

fn accent_material(opacity: f32) -> StandardMaterial {
    let [r, g, b] = ACCENT_RGB;
    StandardMaterial {
        base_color: Color::srgb_u8(r, g, b).with_alpha(opacity),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        cull_mode: None,
        double_sided: true,
        ..default()
    }
}

/// Build the backdrop and arm the frame loop
pub fn mount_backdrop(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut viewport: ResMut<Viewport>,
    seed: Res<ParticleSeed>,
    mut ledger: ResMut<ResourceLedger>,
    mut frame_loop: ResMut<FrameLoop>,
) {
    if let Some(size) = viewport.pending.take() {
        viewport.size = size;
    }
    let size = viewport.size;
    info!("[Backdrop] Mounting at {}x{}...", size.width, size.height);

    let mut tracked = SceneResources::default();

    // Drawing surface: transparent offscreen target the page composites
    let mut surface =
        Image::new_target_texture(size.width, size.height, TextureFormat::bevy_default());
    surface.texture_descriptor.usage |= TextureUsages::COPY_SRC;
    let surface = images.add(surface);
    tracked.surface = Some(surface.clone());

    let [r, g, b] = AMBIENT_RGB;
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(surface.into()),
            clear_color: ClearColorConfig::Custom(Color::NONE),
            // Activated once the first frame is scheduled
            is_active: false,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: camera::FOV_DEGREES.to_radians(),
            aspect_ratio: size.aspect_ratio(),
            near: camera::NEAR,
            far: camera::FAR,
            ..default()
        }),
        Tonemapping::None,
        Msaa::Sample4,
        AmbientLight {
            color: Color::srgb_u8(r, g, b),
            brightness: AMBIENT_BRIGHTNESS,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, camera::DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        OffscreenCamera,
        PointerFollower,
        BackdropObject,
    ));

    // Wireframe dodecahedron
    let mesh = meshes.add(polyhedron_mesh(POLYHEDRON_RADIUS));
    let material = materials.add(accent_material(POLYHEDRON_OPACITY));
    tracked.meshes.push(mesh.clone());
    tracked.materials.push(material.clone());
    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        Spin::new(Vec3::ZERO, Vec3::new(POLYHEDRON_SPIN, POLYHEDRON_SPIN, 0.0)),
        Polyhedron,
        BackdropObject,
    ));

    // Particle field
    let mut rng = match seed.0 {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let points = particle_positions(PARTICLE_COUNT, PARTICLE_SPREAD, &mut rng);
    let mesh = meshes.add(particle_mesh(&points, PARTICLE_SIZE));
    let material = materials.add(accent_material(PARTICLE_OPACITY));
    tracked.meshes.push(mesh.clone());
    tracked.materials.push(material.clone());
    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        Spin::new(Vec3::ZERO, Vec3::new(0.0, PARTICLE_SPIN, 0.0)),
        ParticleField {
            count: points.len(),
        },
        BackdropObject,
    ));

    // Line grid, behind the polyhedron and laid flat
    let planar = grid_lines(GRID_SIZE, GRID_SEGMENTS);
    let mesh = meshes.add(grid_mesh(&planar));
    let material = materials.add(accent_material(GRID_OPACITY));
    tracked.meshes.push(mesh.clone());
    tracked.materials.push(material.clone());
    let grid_spin = Spin::new(Vec3::new(FRAC_PI_2, 0.0, 0.0), Vec3::new(0.0, GRID_SPIN, 0.0));
    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_xyz(0.0, 0.0, GRID_DEPTH).with_rotation(grid_spin.rotation()),
        grid_spin,
        LineGrid { planar },
        BackdropObject,
    ));

    let [r, g, b] = DIRECTIONAL_RGB;
    commands.spawn((
        DirectionalLight {
            color: Color::srgb_u8(r, g, b),
            illuminance: DIRECTIONAL_ILLUMINANCE,
            ..default()
        },
        Transform::from_translation(Vec3::ONE.normalize()).looking_at(Vec3::ZERO, Vec3::Y),
        BackdropObject,
    ));

    ledger.acquired += tracked.len();
    info!(
        "[Backdrop] Mounted: {} graphics resources acquired ({} outstanding)",
        tracked.len(),
        ledger.outstanding()
    );
    commands.insert_resource(tracked);

    // Re-arm even if a loop was left running: the first frame waits a tick
    frame_loop.stop();
    frame_loop.start();
}

/// Cancel the loop, detach the surface and release everything mount acquired
///
/// A no-op for resources when mount never ran; handles are drained so a
/// second teardown finds nothing to release.
pub fn teardown_backdrop(
    mut commands: Commands,
    objects: Query<Entity, With<BackdropObject>>,
    scene: Option<ResMut<SceneResources>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut ledger: ResMut<ResourceLedger>,
    mut frame_loop: ResMut<FrameLoop>,
    host: Option<Res<HostLink>>,
) {
    frame_loop.stop();

    let mut despawned = 0;
    for entity in &objects {
        commands.entity(entity).despawn();
        despawned += 1;
    }

    // Detach the output from the page
    if let Some(host) = host {
        if let Err(e) = host.frame_buffer.clear() {
            warn!("[Backdrop] Could not clear frame buffer: {e}");
        }
    }

    let Some(mut scene) = scene else {
        info!("[Backdrop] Teardown with nothing mounted");
        return;
    };

    let mut released = 0;
    for handle in scene.meshes.drain(..) {
        meshes.remove(handle.id());
        released += 1;
    }
    for handle in scene.materials.drain(..) {
        materials.remove(handle.id());
        released += 1;
    }
    if let Some(handle) = scene.surface.take() {
        images.remove(handle.id());
        released += 1;
    }
    commands.remove_resource::<SceneResources>();

    ledger.released += released;
    info!(
        "[Backdrop] Torn down: {despawned} entities despawned, {released} graphics resources released ({} outstanding)",
        ledger.outstanding()
    );
}
