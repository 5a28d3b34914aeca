//! Normal set file serialization

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result, check_len};

/// A full per-vertex normal array, saved alongside a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalSet {
    /// File format version
    pub version: u32,
    /// Name of the mesh the normals belong to
    pub name: String,
    /// One normal per vertex
    pub normals: Vec<Vec3>,
}

impl NormalSet {
    /// Create a normal set for the named mesh
    pub fn new(name: impl Into<String>, normals: Vec<Vec3>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            normals,
        }
    }

    /// Copy the stored normals into `normals`
    pub fn apply_to(&self, normals: &mut [Vec3]) -> Result<()> {
        check_len("normal set", normals.len(), self.normals.len())?;
        normals.copy_from_slice(&self.normals);
        Ok(())
    }

    /// Serialize to a RON string
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| EditError::Settings(e.to_string()))
    }

    /// Parse from a RON string
    pub fn from_ron(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| EditError::Settings(e.to_string()))
    }

    /// Save to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_ron()?).map_err(|e| EditError::Settings(e.to_string()))?;
        tracing::info!("Saved {} normals to {:?}", self.normals.len(), path);
        Ok(())
    }

    /// Load from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EditError::Settings(e.to_string()))?;
        Self::from_ron(&content)
    }
}
