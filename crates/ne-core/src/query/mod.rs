//! Spatial queries against a triangle soup
//!
//! All queries are brute force over vertices or triangles. Positions are
//! given in model space and moved into world space by the supplied transform
//! before any test against a world-space ray or brush.

mod brush;
mod pick;
mod ray;
mod rect;

use glam::{Mat4, Vec3};

pub use brush::{BrushHit, Falloff, brush_hit, vertices_in_brush};
pub use pick::nearest_vertex;
pub use ray::{TriangleHit, ray_triangle_intersection, raycast};
pub use rect::{ScreenRect, rect_containment};

/// World-space ray with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin of the ray
    pub origin: Vec3,
    /// Normalized direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Squared perpendicular distance from `point` to the ray's line
    pub fn distance_squared_to(&self, point: Vec3) -> f32 {
        (point - self.origin).cross(self.direction).length_squared()
    }
}

/// Closest ray-mesh intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index of the hit triangle
    pub triangle: usize,
    /// Distance along the ray
    pub distance: f32,
    /// World-space hit position
    pub point: Vec3,
}

/// Move model-space positions into world space
pub(crate) fn world_positions(positions: &[Vec3], transform: &Mat4) -> Vec<Vec3> {
    positions
        .iter()
        .map(|&p| transform.transform_point3(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_new_normalizes() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_ray_distance_squared() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!((ray.distance_squared_to(Vec3::new(5.0, 2.0, 0.0)) - 4.0).abs() < 1e-6);
        assert_eq!(ray.distance_squared_to(Vec3::new(3.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_world_positions_translation() {
        let transform = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let world = world_positions(&[Vec3::ZERO, Vec3::X], &transform);
        assert_eq!(world, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 2.0, 3.0)]);
    }
}
