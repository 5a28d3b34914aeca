//! Primitive mesh generation (box, grid)

use glam::{Vec2, Vec3};

use super::Mesh;

/// Generated mesh with its default normals
pub type MeshData = (Mesh, Vec<Vec3>);

/// Generate a box mesh centered at the origin
///
/// # Arguments
/// * `size` - full extents along x, y and z
///
/// # Returns
/// 24 vertices (4 per face, so each face has flat normals) and 12 triangles
pub fn generate_box_mesh(size: Vec3) -> MeshData {
    let h = size * 0.5;

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // Each face is spanned by two axes (u, v) with u x v == outward normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        let center = normal * h;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push(center + u * h * su + v * h * sv);
            normals.push(normal);
            uvs.push(Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
        }
        // Two triangles per face
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mesh = Mesh {
        positions,
        indices,
        uvs,
    };
    (mesh, normals)
}

/// Generate a flat grid in the XY plane, centered at the origin, facing +Z
///
/// # Arguments
/// * `cells` - number of quads along each side
/// * `size` - full side length
pub fn generate_grid_mesh(cells: u32, size: f32) -> MeshData {
    let cells = cells.max(1);
    let side = cells + 1;
    let step = size / cells as f32;
    let half = size * 0.5;

    let mut positions = Vec::with_capacity((side * side) as usize);
    let mut uvs = Vec::with_capacity((side * side) as usize);
    for y in 0..side {
        for x in 0..side {
            positions.push(Vec3::new(x as f32 * step - half, y as f32 * step - half, 0.0));
            uvs.push(Vec2::new(x as f32 / cells as f32, y as f32 / cells as f32));
        }
    }

    let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
    for y in 0..cells {
        for x in 0..cells {
            let i = y * side + x;
            indices.extend_from_slice(&[i, i + 1, i + side + 1, i, i + side + 1, i + side]);
        }
    }

    let normals = vec![Vec3::Z; positions.len()];
    let mesh = Mesh {
        positions,
        indices,
        uvs,
    };
    (mesh, normals)
}
