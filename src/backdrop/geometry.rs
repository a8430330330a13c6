//! Geometry for the decorative objects
//!
//! Pure functions producing vertex data, plus the mesh builders that wrap
//! them. Everything here is deterministic given its inputs so it can be
//! checked without a render device.

use bevy::{
    asset::RenderAssetUsages,
    math::{Vec2, Vec3},
    prelude::Mesh,
    render::render_resource::PrimitiveTopology,
};
use rand::Rng;

use crate::config::animation::{RIPPLE_AMPLITUDE, RIPPLE_FREQUENCY};

// =============================================================================
// Dodecahedron
// =============================================================================

/// The 20 vertices of a regular dodecahedron with the given circumradius
pub fn dodecahedron_vertices(radius: f32) -> Vec<Vec3> {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv = 1.0 / phi;
    let mut vertices = Vec::with_capacity(20);

    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                vertices.push(Vec3::new(x, y, z));
            }
        }
    }
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            vertices.push(Vec3::new(0.0, a * inv, b * phi));
            vertices.push(Vec3::new(a * inv, b * phi, 0.0));
            vertices.push(Vec3::new(a * phi, 0.0, b * inv));
        }
    }

    // Unit coordinates above have circumradius sqrt(3)
    let scale = radius / 3.0_f32.sqrt();
    vertices.into_iter().map(|v| v * scale).collect()
}

/// Index pairs of the 30 edges: vertices at the minimum pairwise distance
pub fn dodecahedron_edges(vertices: &[Vec3]) -> Vec<(usize, usize)> {
    let mut shortest = f32::MAX;
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            shortest = shortest.min(a.distance_squared(*b));
        }
    }

    let tolerance = shortest * 1e-3;
    let mut edges = Vec::with_capacity(30);
    for (i, a) in vertices.iter().enumerate() {
        for (j, b) in vertices.iter().enumerate().skip(i + 1) {
            if (a.distance_squared(*b) - shortest).abs() <= tolerance {
                edges.push((i, j));
            }
        }
    }
    edges
}

/// Wireframe dodecahedron as a line list
pub fn polyhedron_mesh(radius: f32) -> Mesh {
    let vertices = dodecahedron_vertices(radius);
    let positions: Vec<[f32; 3]> = dodecahedron_edges(&vertices)
        .into_iter()
        .flat_map(|(a, b)| [vertices[a].to_array(), vertices[b].to_array()])
        .collect();

    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

// =============================================================================
// Particle Field
// =============================================================================

/// `count` points uniform in [-spread/2, spread/2) on each axis
pub fn particle_positions(count: usize, spread: f32, rng: &mut impl Rng) -> Vec<Vec3> {
    let half = spread / 2.0;
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            )
        })
        .collect()
}

/// One tiny octahedron per point, merged into a single triangle list
pub fn particle_mesh(points: &[Vec3], size: f32) -> Mesh {
    let h = size / 2.0;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(points.len() * 24);

    for &center in points {
        for sx in [-h, h] {
            for sy in [-h, h] {
                for sz in [-h, h] {
                    positions.push((center + Vec3::new(sx, 0.0, 0.0)).to_array());
                    positions.push((center + Vec3::new(0.0, sy, 0.0)).to_array());
                    positions.push((center + Vec3::new(0.0, 0.0, sz)).to_array());
                }
            }
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

// =============================================================================
// Line Grid
// =============================================================================

/// Endpoints of a square grid of line segments in the xy plane
///
/// `segments + 1` lines run along x, then `segments + 1` along y, each
/// stored as two consecutive endpoints.
pub fn grid_lines(size: f32, segments: u32) -> Vec<Vec2> {
    let half = size / 2.0;
    let spacing = size / segments as f32;
    let mut points = Vec::with_capacity((segments as usize + 1) * 4);

    for i in 0..=segments {
        let y = -half + i as f32 * spacing;
        points.push(Vec2::new(-half, y));
        points.push(Vec2::new(half, y));
    }
    for i in 0..=segments {
        let x = -half + i as f32 * spacing;
        points.push(Vec2::new(x, -half));
        points.push(Vec2::new(x, half));
    }
    points
}

/// Ripple height at planar `(x, y)` and ripple time `t`, within ±2·amplitude
pub fn ripple_z(x: f32, y: f32, t: f32) -> f32 {
    (x * RIPPLE_FREQUENCY + t).sin() * RIPPLE_AMPLITUDE
        + (y * RIPPLE_FREQUENCY + t).cos() * RIPPLE_AMPLITUDE
}

/// Grid vertex positions with z displaced by the ripple
pub fn rippled_positions(planar: &[Vec2], t: f32) -> Vec<[f32; 3]> {
    planar
        .iter()
        .map(|p| [p.x, p.y, ripple_z(p.x, p.y, t)])
        .collect()
}

/// Line grid at ripple time zero
pub fn grid_mesh(planar: &[Vec2]) -> Mesh {
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, rippled_positions(planar, 0.0))
}
