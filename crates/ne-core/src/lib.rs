//! Normal editor core
//!
//! Geometry queries and per-vertex normal manipulation for triangle meshes:
//! - [`query`] - Ray casting, vertex picking, brush and rectangle tests
//! - [`selection`] - Per-vertex selection weights (hard, soft, rectangle)
//! - [`transform`] - Move, rotate, scale, paste, equalize and reset of normals
//! - [`mirror`] - Symmetric counterpart search and edit propagation
//! - [`bake`] - Normal map rasterization and sampling
//! - [`session`] - Editing context tying the engines together
//!
//! The caller owns the normal and selection arrays. Every operation mutates
//! them in place and never changes their length.

pub mod bake;
pub mod constants;
pub mod error;
pub mod mesh;
pub mod mirror;
pub mod normal_set;
pub mod query;
pub mod selection;
pub mod session;
pub mod settings;
pub mod transform;

pub use bake::{NormalEncoding, TangentBasis};
pub use constants::*;
pub use error::{EditError, Result};
pub use mesh::{LoadedMesh, Mesh, MeshError};
pub use mirror::{MirrorAxis, MirrorCache, MirrorMode, MirrorRelation};
pub use normal_set::NormalSet;
pub use query::{Falloff, Ray, RayHit, ScreenRect};
pub use selection::SelectionSummary;
pub use session::EditSession;
pub use settings::{BrushSettings, DisplayOptions, EditorSettings};
