//! GPU → CPU readback of the drawing surface
//!
//! Flow:
//! 1. The camera renders into the surface image
//! 2. `SurfaceReadbackNode` copies the GPU image into a mappable buffer after
//!    the camera driver node
//! 3. `map_readback_buffers` maps it after `RenderSystems::Render` and
//!    sends the bytes to the main world
//! 4. `extract_and_publish_frame` publishes them to the page in `Last`

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use bevy::{
    prelude::*,
    render::{
        render_asset::RenderAssets,
        render_graph::{self, NodeRunError, RenderGraph, RenderGraphContext, RenderLabel},
        render_resource::{
            Buffer, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Extent3d, MapMode,
            PollType, TexelCopyBufferInfo, TexelCopyBufferLayout,
        },
        renderer::{RenderContext, RenderDevice, RenderQueue},
        texture::GpuImage,
        Extract, Render, RenderApp, RenderSystems,
    },
};

use crate::backdrop::components::BackdropObject;
use crate::backdrop::resources::{
    BackdropState, CopiedFrame, MainWorldReceiver, PublishStats, RenderWorldSender,
    SceneResources, Viewport,
};
use crate::backdrop::systems::extract_and_publish_frame;

pub struct SurfaceReadbackPlugin;

impl Plugin for SurfaceReadbackPlugin {
    fn build(&self, app: &mut App) {
        let (frame_tx, frame_rx) = crossbeam_channel::unbounded();

        app.insert_resource(MainWorldReceiver(frame_rx))
            .init_resource::<PublishStats>()
            .add_systems(
                PostUpdate,
                attach_surface_output.run_if(in_state(BackdropState::Mounted)),
            )
            .add_systems(Last, extract_and_publish_frame);

        let render_app = app.sub_app_mut(RenderApp);

        let mut graph = render_app.world_mut().resource_mut::<RenderGraph>();
        graph.add_node(SurfaceReadbackLabel, SurfaceReadbackNode);
        graph.add_node_edge(bevy::render::graph::CameraDriverLabel, SurfaceReadbackLabel);

        render_app
            .insert_resource(RenderWorldSender(frame_tx))
            .add_systems(ExtractSchedule, extract_surface_readbacks)
            .add_systems(
                Render,
                map_readback_buffers.after(RenderSystems::Render),
            );
    }
}

#[derive(Clone, Default, Resource, Deref, DerefMut)]
struct SurfaceReadbacks(pub Vec<SurfaceReadback>);

/// Mappable buffer bound to one surface image of a fixed size
#[derive(Clone, Component)]
pub struct SurfaceReadback {
    buffer: Buffer,
    /// Set by the driver when this frame's copy was recorded
    copied: Arc<AtomicBool>,
    src_image: Handle<Image>,
    size: Extent3d,
}

impl SurfaceReadback {
    pub fn new(src_image: Handle<Image>, size: Extent3d, render_device: &RenderDevice) -> Self {
        let padded_bytes_per_row =
            RenderDevice::align_copy_bytes_per_row(size.width as usize * 4);

        let buffer = render_device.create_buffer(&BufferDescriptor {
            label: Some("backdrop_readback"),
            size: padded_bytes_per_row as u64 * size.height as u64,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            copied: Arc::new(AtomicBool::new(false)),
            src_image,
            size,
        }
    }

    pub fn matches(&self, image: &Handle<Image>, size: Extent3d) -> bool {
        self.src_image == *image && self.size == size
    }
}

/// Attach a readback to the surface, replacing it when the surface is resized
///
/// Without a render device there is no graphics context: the backdrop keeps
/// animating but nothing reaches the page.
fn attach_surface_output(
    mut commands: Commands,
    render_device: Option<Res<RenderDevice>>,
    scene: Option<Res<SceneResources>>,
    viewport: Res<Viewport>,
    existing: Query<(Entity, &SurfaceReadback)>,
    mut warned: Local<bool>,
) {
    let Some(surface) = scene.as_ref().and_then(|scene| scene.surface.clone()) else {
        return;
    };
    let Some(render_device) = render_device else {
        if !*warned {
            warn!("[Backdrop] No graphics context: surface output not attached");
            *warned = true;
        }
        return;
    };

    let size = Extent3d {
        width: viewport.size.width,
        height: viewport.size.height,
        depth_or_array_layers: 1,
    };
    if existing.iter().any(|(_, readback)| readback.matches(&surface, size)) {
        return;
    }

    for (entity, _) in existing.iter() {
        commands.entity(entity).despawn();
    }
    commands.spawn((SurfaceReadback::new(surface, size, &render_device), BackdropObject));
    info!(
        "[Backdrop] Surface output attached at {}x{}",
        size.width, size.height
    );
}

fn extract_surface_readbacks(mut commands: Commands, readbacks: Extract<Query<&SurfaceReadback>>) {
    commands.insert_resource(SurfaceReadbacks(
        readbacks.iter().cloned().collect::<Vec<SurfaceReadback>>(),
    ));
}

#[derive(Debug, PartialEq, Eq, Clone, Hash, RenderLabel)]
struct SurfaceReadbackLabel;

#[derive(Default)]
struct SurfaceReadbackNode;

impl render_graph::Node for SurfaceReadbackNode {
    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let (Some(readbacks), Some(gpu_images), Some(render_queue)) = (
            world.get_resource::<SurfaceReadbacks>(),
            world.get_resource::<RenderAssets<GpuImage>>(),
            world.get_resource::<RenderQueue>(),
        ) else {
            return Ok(());
        };

        for readback in readbacks.iter() {
            // Surface released, or not yet re-prepared after a resize
            let Some(src_image) = gpu_images.get(&readback.src_image) else {
                continue;
            };
            if src_image.size != readback.size {
                continue;
            }
            let Some(block_size) = src_image.texture_format.block_copy_size(None) else {
                continue;
            };

            let mut encoder = render_context
                .render_device()
                .create_command_encoder(&CommandEncoderDescriptor::default());

            let block_dimensions = src_image.texture_format.block_dimensions();
            let padded_bytes_per_row = RenderDevice::align_copy_bytes_per_row(
                (src_image.size.width as usize / block_dimensions.0 as usize) * block_size as usize,
            );

            encoder.copy_texture_to_buffer(
                src_image.texture.as_image_copy(),
                TexelCopyBufferInfo {
                    buffer: &readback.buffer,
                    layout: TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_bytes_per_row as u32),
                        rows_per_image: None,
                    },
                },
                src_image.size,
            );

            render_queue.submit(std::iter::once(encoder.finish()));
            readback.copied.store(true, Ordering::Release);
        }

        Ok(())
    }
}

fn map_readback_buffers(
    readbacks: Res<SurfaceReadbacks>,
    render_device: Res<RenderDevice>,
    sender: Res<RenderWorldSender>,
) {
    for readback in readbacks.0.iter() {
        if !readback.copied.swap(false, Ordering::Acquire) {
            continue;
        }

        let buffer_slice = readback.buffer.slice(..);

        let (map_tx, map_rx) = crossbeam_channel::bounded(1);
        buffer_slice.map_async(MapMode::Read, move |result| {
            let _ = map_tx.send(result);
        });

        if let Err(e) = render_device.poll(PollType::wait()) {
            warn!("[Backdrop] Device poll failed during readback: {e}");
            continue;
        }

        match map_rx.recv() {
            Ok(Ok(())) => {
                let _ = sender.send(CopiedFrame {
                    width: readback.size.width,
                    height: readback.size.height,
                    padded_rgba: buffer_slice.get_mapped_range().to_vec(),
                });
                readback.buffer.unmap();
            }
            Ok(Err(e)) => warn!("[Backdrop] Failed to map readback buffer: {e}"),
            Err(e) => warn!("[Backdrop] Readback callback dropped: {e}"),
        }
    }
}
