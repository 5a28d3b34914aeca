//! Per-vertex tangent generation from UV layout

use glam::{Vec2, Vec3, Vec4};

/// Calculate per-vertex tangents with handedness in `w`
///
/// Tangents are accumulated per triangle from the UV gradient, then
/// Gram-Schmidt orthogonalized against the vertex normal. Vertices whose UVs
/// are degenerate get an arbitrary tangent perpendicular to the normal.
pub fn calculate_tangents(
    positions: &[Vec3],
    normals: &[Vec3],
    uvs: &[Vec2],
    indices: &[u32],
) -> Vec<Vec4> {
    let mut tan = vec![Vec3::ZERO; positions.len()];
    let mut bitan = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let e1 = positions[i1] - positions[i0];
        let e2 = positions[i2] - positions[i0];
        let d1 = uvs[i1] - uvs[i0];
        let d2 = uvs[i2] - uvs[i0];

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let sdir = (e1 * d2.y - e2 * d1.y) * r;
        let tdir = (e2 * d1.x - e1 * d2.x) * r;

        for i in [i0, i1, i2] {
            tan[i] += sdir;
            bitan[i] += tdir;
        }
    }

    normals
        .iter()
        .zip(tan.iter().zip(bitan.iter()))
        .map(|(&n, (&t, &b))| {
            let ortho = (t - n * n.dot(t))
                .try_normalize()
                .unwrap_or_else(|| n.any_orthonormal_vector());
            let w = if n.cross(ortho).dot(b) < 0.0 { -1.0 } else { 1.0 };
            ortho.extend(w)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tangents_follow_u_axis() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = vec![Vec3::Z; 3];
        let uvs = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
        let tangents = calculate_tangents(&positions, &normals, &uvs, &[0, 1, 2]);

        for t in tangents {
            assert!((t.truncate() - Vec3::X).length() < 1e-6);
            assert_eq!(t.w, 1.0);
        }
    }

    #[test]
    fn test_tangents_mirrored_uvs_flip_handedness() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = vec![Vec3::Z; 3];
        let uvs = vec![Vec2::ZERO, Vec2::X, Vec2::new(0.0, -1.0)];
        let tangents = calculate_tangents(&positions, &normals, &uvs, &[0, 1, 2]);
        assert_eq!(tangents[0].w, -1.0);
    }

    #[test]
    fn test_tangents_degenerate_uvs() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = vec![Vec3::Z; 3];
        let uvs = vec![Vec2::ZERO; 3];
        let tangents = calculate_tangents(&positions, &normals, &uvs, &[0, 1, 2]);
        for t in tangents {
            assert!(t.truncate().dot(Vec3::Z).abs() < 1e-6);
            assert!((t.truncate().length() - 1.0).abs() < 1e-6);
        }
    }
}
