//! Error types shared by every engine

/// Result alias for normal editing operations
pub type Result<T> = std::result::Result<T, EditError>;

/// Normal editing errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// Mismatched lengths, out-of-range indices or malformed arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// No vertex pairs were found across the mirror plane
    #[error("Mesh is not symmetric across the mirror plane")]
    NotSymmetric,
    /// Normal map could not be read, written or rasterized
    #[error("Bake failed: {0}")]
    BakeFailed(String),
    /// Settings or normal set (de)serialization and I/O
    #[error("Settings error: {0}")]
    Settings(String),
}

impl EditError {
    pub(crate) fn length_mismatch(what: &str, expected: usize, actual: usize) -> Self {
        EditError::InvalidInput(format!(
            "{what} has {actual} entries, expected {expected}"
        ))
    }
}

/// Fail with `InvalidInput` unless `actual == expected`
pub(crate) fn check_len(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(EditError::length_mismatch(what, expected, actual))
    }
}

/// Validate a triangle index buffer against a vertex count
pub(crate) fn check_indices(indices: &[u32], vertex_count: usize) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(EditError::InvalidInput(format!(
            "index count {} is not a multiple of 3",
            indices.len()
        )));
    }
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(EditError::InvalidInput(format!(
            "index {bad} out of range for {vertex_count} vertices"
        )));
    }
    Ok(())
}
