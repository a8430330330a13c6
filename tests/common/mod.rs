//! Headless app harness shared by the integration tests

#![allow(dead_code)]

use bevy::{asset::AssetPlugin, prelude::*, state::app::StatesPlugin};
use hero_backdrop_lib::backdrop::components::{BackdropObject, OffscreenCamera};
use crossbeam_channel::Sender;
use hero_backdrop_lib::backdrop::resources::{
    CopiedFrame, MainWorldReceiver, PublishStats, ResourceLedger, SceneResources,
};
use hero_backdrop_lib::backdrop::systems::extract_and_publish_frame;
use hero_backdrop_lib::backdrop::{BackdropPlugin, BackdropState, FrameLoop, ParticleSeed};
use hero_backdrop_lib::tauri_bridge::{BackdropHost, ViewportSize};

/// Backdrop app without any rendering backend
pub fn test_app(host: &BackdropHost) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin));
    app.init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .init_asset::<Image>();
    app.insert_resource(ParticleSeed(Some(7)));
    app.add_plugins(BackdropPlugin::new(host.clone()));
    app
}

/// Backdrop app whose frame publishing is fed by the returned sender in
/// place of the GPU readback
pub fn readback_app(host: &BackdropHost) -> (App, Sender<CopiedFrame>) {
    let mut app = test_app(host);
    let (frame_tx, frame_rx) = crossbeam_channel::unbounded();
    app.insert_resource(MainWorldReceiver(frame_rx))
        .init_resource::<PublishStats>()
        .add_systems(Last, extract_and_publish_frame);
    (app, frame_tx)
}

/// A copied frame 64 px wide, so rows need no copy padding
pub fn copied_frame(height: u32, value: u8) -> CopiedFrame {
    CopiedFrame {
        width: 64,
        height,
        padded_rgba: vec![value; 64 * 4 * height as usize],
    }
}

pub fn host_800x600() -> BackdropHost {
    BackdropHost::new(ViewportSize::new(800, 600).unwrap()).unwrap()
}

/// Mount and run the mount tick; the first frame runs on the following tick
pub fn mounted_app(host: &BackdropHost) -> App {
    let mut app = test_app(host);
    host.mount().unwrap();
    app.update();
    assert_eq!(state(&app), BackdropState::Mounted);
    app
}

pub fn run_frames(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

pub fn state(app: &App) -> BackdropState {
    *app.world().resource::<State<BackdropState>>().get()
}

pub fn frames_run(app: &App) -> u64 {
    app.world().resource::<FrameLoop>().frames_run()
}

pub fn ledger(app: &App) -> ResourceLedger {
    *app.world().resource::<ResourceLedger>()
}

pub fn camera_transform(app: &mut App) -> Transform {
    let mut query = app
        .world_mut()
        .query_filtered::<&Transform, With<OffscreenCamera>>();
    *query.single(app.world()).unwrap()
}

pub fn backdrop_entities(app: &mut App) -> usize {
    let mut query = app
        .world_mut()
        .query_filtered::<Entity, With<BackdropObject>>();
    query.iter(app.world()).count()
}

pub fn live_assets(app: &App) -> (usize, usize, usize) {
    let world = app.world();
    (
        world.resource::<Assets<Mesh>>().len(),
        world.resource::<Assets<StandardMaterial>>().len(),
        world.resource::<Assets<Image>>().len(),
    )
}

pub fn surface_size(app: &App) -> Option<(u32, u32)> {
    let world = app.world();
    let handle = world.get_resource::<SceneResources>()?.surface.clone()?;
    let image = world.resource::<Assets<Image>>().get(&handle)?;
    Some((image.width(), image.height()))
}
