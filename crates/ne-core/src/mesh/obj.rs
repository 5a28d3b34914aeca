//! OBJ mesh file loading

use std::io::{BufRead, Cursor};
use std::path::Path;

use glam::{Vec2, Vec3};

use super::{LoadedMesh, Mesh, MeshError, calculate_vertex_normals};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Load an OBJ file
pub fn load_obj(path: impl AsRef<Path>) -> Result<LoadedMesh, MeshError> {
    let path = path.as_ref();
    let (models, _materials) =
        tobj::load_obj(path, &load_options()).map_err(|e| match e {
            tobj::LoadError::OpenFileFailed | tobj::LoadError::ReadError => {
                MeshError::Io(format!("{}: {}", path.display(), e))
            }
            other => MeshError::Parse(other.to_string()),
        })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string();
    let loaded = build_mesh(name, &models)?;
    tracing::info!(
        "Loaded OBJ '{}': {} vertices, {} triangles",
        loaded.name,
        loaded.mesh.vertex_count(),
        loaded.mesh.triangle_count()
    );
    Ok(loaded)
}

/// Load an OBJ from bytes
pub fn load_obj_from_bytes(name: &str, data: &[u8]) -> Result<LoadedMesh, MeshError> {
    let mut cursor = Cursor::new(data);
    load_obj_from_reader(name, &mut cursor)
}

fn load_obj_from_reader(name: &str, reader: &mut impl BufRead) -> Result<LoadedMesh, MeshError> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default()))
            .map_err(|e| MeshError::Parse(e.to_string()))?;
    build_mesh(name.to_string(), &models)
}

/// Merge all OBJ models into a single mesh
fn build_mesh(name: String, models: &[tobj::Model]) -> Result<LoadedMesh, MeshError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut all_have_normals = true;
    let mut all_have_uvs = true;

    for model in models {
        let mesh = &model.mesh;
        let vertex_offset = positions.len() as u32;
        let count = mesh.positions.len() / 3;

        positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|c| Vec3::new(c[0], c[1], c[2])),
        );

        if mesh.normals.len() == count * 3 {
            normals.extend(
                mesh.normals
                    .chunks_exact(3)
                    .map(|c| Vec3::new(c[0], c[1], c[2]).normalize_or_zero()),
            );
        } else {
            all_have_normals = false;
        }

        if mesh.texcoords.len() == count * 2 {
            uvs.extend(mesh.texcoords.chunks_exact(2).map(|c| Vec2::new(c[0], c[1])));
        } else {
            all_have_uvs = false;
        }

        indices.extend(mesh.indices.iter().map(|&i| vertex_offset + i));
    }

    if positions.is_empty() || indices.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    if !all_have_uvs {
        uvs.clear();
    }

    // Calculate smooth normals if the file lacks them (or has zero-length ones)
    if !all_have_normals || normals.iter().any(|n| *n == Vec3::ZERO) {
        let computed = calculate_vertex_normals(&positions, &indices);
        normals = computed
            .into_iter()
            .map(|n| if n == Vec3::ZERO { Vec3::Z } else { n })
            .collect();
    }

    let mesh = Mesh::new(positions, indices, uvs)?;
    Ok(LoadedMesh { name, mesh, normals })
}
