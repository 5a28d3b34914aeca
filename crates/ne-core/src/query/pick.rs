//! Vertex picking along a ray

use glam::{Mat4, Vec3};

use super::Ray;
use crate::constants::PICK_TOLERANCE;
use crate::error::{Result, check_len};

/// Find the vertex closest to a pick ray.
///
/// A vertex is a candidate when its squared perpendicular distance to the ray
/// is below `PICK_TOLERANCE²` and its normal (rotated into world space) faces
/// against the ray direction. `allow_backface` lifts the facing test. Among
/// candidates the smallest distance wins, ties going to the lowest index.
pub fn nearest_vertex(
    ray: &Ray,
    positions: &[Vec3],
    normals: &[Vec3],
    transform: &Mat4,
    allow_backface: bool,
) -> Result<Option<usize>> {
    check_len("normals", positions.len(), normals.len())?;

    let (_, rotation, _) = transform.to_scale_rotation_translation();
    let threshold = PICK_TOLERANCE * PICK_TOLERANCE;

    let mut best: Option<(f32, usize)> = None;
    for (i, (&p, &n)) in positions.iter().zip(normals).enumerate() {
        let distance = ray.distance_squared_to(transform.transform_point3(p));
        if distance >= threshold {
            continue;
        }
        let front_facing = (rotation * n).dot(ray.direction) <= 0.0;
        if !front_facing && !allow_backface {
            continue;
        }
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, i));
        }
    }

    Ok(best.map(|(_, i)| i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_points() -> (Vec<Vec3>, Vec<Vec3>) {
        (
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.03, 0.0, 0.0)],
            vec![Vec3::Z, Vec3::Z],
        )
    }

    #[test]
    fn test_pick_closest_vertex() {
        let (positions, normals) = two_points();
        let ray = Ray::new(Vec3::new(0.025, 0.0, 5.0), Vec3::NEG_Z);
        let picked = nearest_vertex(&ray, &positions, &normals, &Mat4::IDENTITY, false).unwrap();
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn test_pick_outside_tolerance() {
        let (positions, normals) = two_points();
        let ray = Ray::new(Vec3::new(1.0, 1.0, 5.0), Vec3::NEG_Z);
        let picked = nearest_vertex(&ray, &positions, &normals, &Mat4::IDENTITY, false).unwrap();
        assert_eq!(picked, None);
    }

    #[test]
    fn test_pick_skips_backface() {
        let (positions, normals) = two_points();
        // Looking from below: normals point away from the viewer
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let picked = nearest_vertex(&ray, &positions, &normals, &Mat4::IDENTITY, false).unwrap();
        assert_eq!(picked, None);

        let picked = nearest_vertex(&ray, &positions, &normals, &Mat4::IDENTITY, true).unwrap();
        assert_eq!(picked, Some(0));
    }

    #[test]
    fn test_pick_rotated_transform_flips_facing() {
        let (positions, normals) = two_points();
        let transform = Mat4::from_rotation_x(std::f32::consts::PI);
        // Rotated normals now point to -Z; a ray along +Z sees them front-on
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let picked = nearest_vertex(&ray, &positions, &normals, &transform, false).unwrap();
        assert_eq!(picked, Some(0));
    }

    #[test]
    fn test_pick_length_mismatch() {
        let (positions, _) = two_points();
        let ray = Ray::new(Vec3::Z, Vec3::NEG_Z);
        let result = nearest_vertex(&ray, &positions, &[Vec3::Z], &Mat4::IDENTITY, false);
        assert!(result.is_err());
    }
}
