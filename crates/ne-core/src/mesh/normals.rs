//! Normal calculation utilities for mesh data

use glam::Vec3;

/// Calculate the unit normal of a single triangle
///
/// Degenerate triangles fall back to +Z.
pub fn calculate_triangle_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).try_normalize().unwrap_or(Vec3::Z)
}

/// Calculate area-weighted per-vertex normals from positions and indices
///
/// Each triangle contributes its unnormalized face normal (twice its area) to
/// its three corners. Vertices touched by no non-degenerate triangle get a
/// zero vector; callers decide what to substitute.
pub fn calculate_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[i1] - positions[i0]).cross(positions[i2] - positions[i0]);
        accum[i0] += face;
        accum[i1] += face;
        accum[i2] += face;
    }

    accum.into_iter().map(Vec3::normalize_or_zero).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_normal_ccw() {
        let n = calculate_triangle_normal(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn test_triangle_normal_degenerate() {
        let n = calculate_triangle_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn test_vertex_normals_shared_edge() {
        // Two triangles folded 90 degrees along the X axis
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let indices = vec![0, 1, 2, 0, 3, 1];
        let normals = calculate_vertex_normals(&positions, &indices);

        let expected = (Vec3::Z + Vec3::Y).normalize();
        assert!((normals[0] - expected).length() < 1e-6);
        assert!((normals[1] - expected).length() < 1e-6);
        assert_eq!(normals[2], Vec3::Z);
        assert_eq!(normals[3], Vec3::Y);
    }

    #[test]
    fn test_vertex_normals_unreferenced_vertex() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        let normals = calculate_vertex_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals[3], Vec3::ZERO);
    }
}
