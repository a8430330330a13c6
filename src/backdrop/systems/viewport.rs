//! Viewport resize system
//!
//! A resize reported by the host is applied on the next frame: the camera
//! aspect ratio and the drawing surface size change together.

use bevy::{prelude::*, render::render_resource::Extent3d};

use crate::backdrop::components::OffscreenCamera;
use crate::backdrop::resources::{SceneResources, Viewport};

pub fn apply_viewport_resize(
    mut viewport: ResMut<Viewport>,
    mut cameras: Query<&mut Projection, With<OffscreenCamera>>,
    scene: Option<Res<SceneResources>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(size) = viewport.pending.take() else {
        return;
    };
    if size == viewport.size {
        return;
    }
    viewport.size = size;

    for mut projection in cameras.iter_mut() {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = size.aspect_ratio();
        }
    }

    let surface = scene.as_ref().and_then(|scene| scene.surface.as_ref());
    if let Some(mut image) = surface.and_then(|handle| images.get_mut(handle)) {
        let extent = Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        };
        if image.data.is_some() {
            image.resize(extent);
        } else {
            image.texture_descriptor.size = extent;
        }
    }

    info!("[Backdrop] Viewport resized to {}x{}", size.width, size.height);
}
