//! Ray-mesh intersection
//!
//! Ray-triangle tests use the Moller-Trumbore algorithm.

use glam::{Mat4, Vec3};

use super::{Ray, RayHit, world_positions};
use crate::constants::RAY_EPSILON;
use crate::error::{Result, check_indices};

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection.
///
/// Both faces of the triangle are hit. Near-parallel rays and zero-area
/// triangles (determinant below [`RAY_EPSILON`]) never hit, and neither do
/// intersections behind the ray origin.
pub fn ray_triangle_intersection(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray.direction.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < RAY_EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// Cast a ray against a mesh and return the closest hit.
///
/// Triangle vertices are moved into world space by `transform` first. When
/// several triangles share the minimum distance the lowest triangle index
/// wins.
///
/// # Arguments
/// * `ray` - World-space ray
/// * `positions` - Model-space vertex positions
/// * `indices` - Triangle indices (3 per triangle)
/// * `transform` - Model-to-world matrix
pub fn raycast(
    ray: &Ray,
    positions: &[Vec3],
    indices: &[u32],
    transform: &Mat4,
) -> Result<Option<RayHit>> {
    check_indices(indices, positions.len())?;
    let world = world_positions(positions, transform);
    Ok(raycast_world(ray, &world, indices))
}

/// Raycast against positions that are already in world space
pub(crate) fn raycast_world(ray: &Ray, world: &[Vec3], indices: &[u32]) -> Option<RayHit> {
    let mut closest: Option<(f32, usize)> = None;

    // Brute force over every triangle
    for (tri_idx, tri) in indices.chunks_exact(3).enumerate() {
        let v0 = world[tri[0] as usize];
        let v1 = world[tri[1] as usize];
        let v2 = world[tri[2] as usize];

        if let Some(hit) = ray_triangle_intersection(ray, v0, v1, v2) {
            let closer = match closest {
                Some((best, _)) => hit.t < best,
                None => true,
            };
            if closer {
                closest = Some((hit.t, tri_idx));
            }
        }
    }

    closest.map(|(distance, triangle)| RayHit {
        triangle,
        distance,
        point: ray.at(distance),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> (Vec<Vec3>, Vec<u32>) {
        (vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2])
    }

    #[test]
    fn test_ray_hits_triangle_centroid() {
        let (positions, indices) = unit_triangle();
        let ray = Ray::new(Vec3::new(1.0 / 3.0, 1.0 / 3.0, 1.0), Vec3::NEG_Z);

        let hit = raycast(&ray, &positions, &indices, &Mat4::IDENTITY)
            .unwrap()
            .expect("ray should hit");
        assert_eq!(hit.triangle, 0);
        assert!((hit.distance - 1.0).abs() < 1e-6);
        assert!(hit.point.z.abs() < 1e-6);
    }

    #[test]
    fn test_ray_misses_triangle() {
        let (positions, indices) = unit_triangle();
        let ray = Ray::new(Vec3::new(2.0, 2.0, 1.0), Vec3::NEG_Z);
        let hit = raycast(&ray, &positions, &indices, &Mat4::IDENTITY).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_behind_origin() {
        let (positions, indices) = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z);
        let hit = raycast(&ray, &positions, &indices, &Mat4::IDENTITY).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_hits_back_face() {
        let (positions, indices) = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);
        let hit = raycast(&ray, &positions, &indices, &Mat4::IDENTITY).unwrap();
        assert!(hit.is_some());
    }

    #[test]
    fn test_degenerate_triangle_ignored() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::NEG_Z);
        let hit = raycast(&ray, &positions, &[0, 1, 2], &Mat4::IDENTITY).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_nearest_of_two_triangles() {
        // Same triangle shape at z = 0 and z = 0.5
        let positions = vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(1.0, 0.0, 0.5),
            Vec3::new(0.0, 1.0, 0.5),
        ];
        let indices = vec![0, 1, 2, 3, 4, 5];
        let ray = Ray::new(Vec3::new(0.25, 0.25, 2.0), Vec3::NEG_Z);

        let hit = raycast(&ray, &positions, &indices, &Mat4::IDENTITY)
            .unwrap()
            .unwrap();
        assert_eq!(hit.triangle, 1);
        assert!((hit.distance - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_tie_keeps_first_triangle() {
        let (positions, _) = unit_triangle();
        let indices = vec![0, 1, 2, 0, 1, 2];
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::NEG_Z);
        let hit = raycast(&ray, &positions, &indices, &Mat4::IDENTITY)
            .unwrap()
            .unwrap();
        assert_eq!(hit.triangle, 0);
    }

    #[test]
    fn test_raycast_applies_transform() {
        let (positions, indices) = unit_triangle();
        let transform = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));

        let ray = Ray::new(Vec3::new(10.25, 0.25, 1.0), Vec3::NEG_Z);
        let hit = raycast(&ray, &positions, &indices, &transform).unwrap();
        assert!(hit.is_some());

        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::NEG_Z);
        let hit = raycast(&ray, &positions, &indices, &transform).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_raycast_rejects_bad_indices() {
        let (positions, _) = unit_triangle();
        let ray = Ray::new(Vec3::Z, Vec3::NEG_Z);
        assert!(raycast(&ray, &positions, &[0, 1, 7], &Mat4::IDENTITY).is_err());
    }
}
