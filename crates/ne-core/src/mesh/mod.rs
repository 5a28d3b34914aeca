//! Mesh data and loading (OBJ format, generated primitives)

mod normals;
mod obj;
pub mod primitive;
mod tangents;

use glam::{Vec2, Vec3};

use crate::error::{EditError, Result, check_indices};

pub use normals::{calculate_triangle_normal, calculate_vertex_normals};
pub use obj::{load_obj, load_obj_from_bytes};
pub use tangents::calculate_tangents;

/// Triangle mesh with immutable topology
///
/// Positions are in model space. `uvs` is either empty or parallel to
/// `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    uvs: Vec<Vec2>,
}

impl Mesh {
    /// Create a mesh, validating index range and attribute lengths
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, uvs: Vec<Vec2>) -> Result<Self> {
        check_indices(&indices, positions.len())?;
        if !uvs.is_empty() && uvs.len() != positions.len() {
            return Err(EditError::InvalidInput(format!(
                "uv count {} does not match vertex count {}",
                uvs.len(),
                positions.len()
            )));
        }
        Ok(Self {
            positions,
            indices,
            uvs,
        })
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle indices (3 per triangle)
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Texture coordinates (empty if the mesh has none)
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Whether the mesh carries texture coordinates
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the vertex indices for a triangle
    pub fn triangle(&self, tri_index: usize) -> [usize; 3] {
        let base = tri_index * 3;
        [
            self.indices[base] as usize,
            self.indices[base + 1] as usize,
            self.indices[base + 2] as usize,
        ]
    }

    /// Area-weighted vertex normals computed from the topology
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        calculate_vertex_normals(&self.positions, &self.indices)
    }
}

/// Mesh and normals read from a file
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    /// Name derived from the file stem
    pub name: String,
    /// Validated mesh
    pub mesh: Mesh,
    /// Per-vertex normals (from the file, or computed when absent)
    pub normals: Vec<Vec3>,
}

/// Mesh-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    /// File could not be opened or read
    #[error("IO error: {0}")]
    Io(String),
    /// File contents are not valid OBJ
    #[error("Parse error: {0}")]
    Parse(String),
    /// File holds no triangles
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    /// Geometry failed validation
    #[error("Invalid mesh: {0}")]
    Invalid(#[from] EditError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_positions() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::X, Vec3::Y]
    }

    #[test]
    fn test_mesh_new_valid() {
        let mesh = Mesh::new(triangle_positions(), vec![0, 1, 2], Vec::new()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle(0), [0, 1, 2]);
        assert!(!mesh.has_uvs());
    }

    #[test]
    fn test_mesh_rejects_out_of_range_index() {
        let result = Mesh::new(triangle_positions(), vec![0, 1, 5], Vec::new());
        assert!(matches!(result, Err(EditError::InvalidInput(_))));
    }

    #[test]
    fn test_mesh_rejects_partial_triangle() {
        let result = Mesh::new(triangle_positions(), vec![0, 1], Vec::new());
        assert!(matches!(result, Err(EditError::InvalidInput(_))));
    }

    #[test]
    fn test_mesh_rejects_uv_mismatch() {
        let result = Mesh::new(triangle_positions(), vec![0, 1, 2], vec![Vec2::ZERO]);
        assert!(matches!(result, Err(EditError::InvalidInput(_))));
    }
}
