//! Brush proximity tests and falloff

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::ray::raycast_world;
use super::{Ray, RayHit, world_positions};
use crate::error::{Result, check_indices};

/// Falloff curve for brush influence: `(1 - d / r)^power`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    /// Exponent shaping the curve (1.0 = linear, < 1.0 = wide, > 1.0 = sharp)
    pub power: f32,
}

impl Default for Falloff {
    fn default() -> Self {
        Self { power: 1.0 }
    }
}

impl Falloff {
    /// Create a falloff with the given exponent
    pub fn new(power: f32) -> Self {
        Self { power }
    }

    /// Weight in [0, 1] at `distance` from the brush center
    pub fn weight(&self, distance: f32, radius: f32) -> f32 {
        if radius <= 0.0 {
            return 0.0;
        }
        let t = (1.0 - distance / radius).clamp(0.0, 1.0);
        if t == 0.0 {
            0.0
        } else {
            t.powf(self.power).clamp(0.0, 1.0)
        }
    }
}

/// Vertices whose world position lies within `radius` of `center`.
///
/// A non-positive radius covers nothing.
///
/// Returns `(vertex index, distance)` pairs in index order.
pub fn vertices_in_brush(
    center: Vec3,
    radius: f32,
    positions: &[Vec3],
    transform: &Mat4,
) -> Vec<(usize, f32)> {
    collect_in_radius(center, radius, &world_positions(positions, transform))
}

fn collect_in_radius(center: Vec3, radius: f32, world: &[Vec3]) -> Vec<(usize, f32)> {
    if radius <= 0.0 {
        return Vec::new();
    }
    let radius_sq = radius * radius;
    world
        .iter()
        .enumerate()
        .filter_map(|(i, &p)| {
            let d_sq = p.distance_squared(center);
            (d_sq <= radius_sq).then(|| (i, d_sq.sqrt()))
        })
        .collect()
}

/// Surface hit of a brush stroke with the vertices it covers
#[derive(Debug, Clone, PartialEq)]
pub struct BrushHit {
    /// Where the brush ray met the mesh
    pub hit: RayHit,
    /// `(vertex index, distance from hit point)` for every covered vertex
    pub vertices: Vec<(usize, f32)>,
}

/// Cast the brush ray and gather vertices within `radius` of the hit point.
///
/// Returns `None` when the ray misses the mesh.
pub fn brush_hit(
    ray: &Ray,
    positions: &[Vec3],
    indices: &[u32],
    radius: f32,
    transform: &Mat4,
) -> Result<Option<BrushHit>> {
    check_indices(indices, positions.len())?;
    let world = world_positions(positions, transform);
    let Some(hit) = raycast_world(ray, &world, indices) else {
        return Ok(None);
    };

    let vertices = collect_in_radius(hit.point, radius, &world);
    tracing::debug!(
        "Brush hit triangle {} at {:?}, {} vertices in radius",
        hit.triangle,
        hit.point,
        vertices.len()
    );
    Ok(Some(BrushHit { hit, vertices }))
}
