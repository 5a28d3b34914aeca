//! Editor settings
//!
//! Brush, mirroring and display options. Settings serialize to RON so they
//! can be persisted between sessions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BRUSH_POWER, DEFAULT_BRUSH_RADIUS, DEFAULT_BRUSH_STRENGTH, MIRROR_EPSILON,
};
use crate::error::{EditError, Result};
use crate::mirror::MirrorMode;

/// Brush parameters shared by selection and equalize strokes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BrushSettings {
    /// Brush radius in world units
    pub radius: f32,
    /// Falloff exponent
    pub falloff_power: f32,
    /// Strength multiplier (negative values erase soft selection)
    pub strength: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BRUSH_RADIUS,
            falloff_power: DEFAULT_BRUSH_POWER,
            strength: DEFAULT_BRUSH_STRENGTH,
        }
    }
}

/// Sizes and colors used by a viewport drawing vertices and normals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayOptions {
    /// Whether vertices are drawn
    pub show_vertices: bool,
    /// Whether normals are drawn
    pub show_normals: bool,
    /// Whether tangents are drawn
    pub show_tangents: bool,
    /// Whether binormals are drawn
    pub show_binormals: bool,
    /// Vertex marker size
    pub vertex_size: f32,
    /// Normal line length
    pub normal_size: f32,
    /// Tangent line length
    pub tangent_size: f32,
    /// Binormal line length
    pub binormal_size: f32,
    /// Unselected vertex color (RGBA)
    pub vertex_color: [f32; 4],
    /// Selected vertex color (RGBA)
    pub selected_vertex_color: [f32; 4],
    /// Normal line color (RGBA)
    pub normal_color: [f32; 4],
    /// Tangent line color (RGBA)
    pub tangent_color: [f32; 4],
    /// Binormal line color (RGBA)
    pub binormal_color: [f32; 4],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_vertices: true,
            show_normals: true,
            show_tangents: false,
            show_binormals: false,
            vertex_size: 0.0075,
            normal_size: 0.10,
            tangent_size: 0.075,
            binormal_size: 0.06,
            vertex_color: [0.15, 0.15, 0.4, 0.75],
            selected_vertex_color: [1.0, 0.0, 0.0, 0.75],
            normal_color: [1.0, 0.92, 0.016, 1.0],
            tangent_color: [0.0, 1.0, 1.0, 1.0],
            binormal_color: [0.0, 1.0, 0.0, 1.0],
        }
    }
}

/// All persistent editor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// Brush used by soft/hard selection and equalize
    pub brush: BrushSettings,
    /// Active mirror mode
    pub mirror_mode: MirrorMode,
    /// Position tolerance when pairing mirrored vertices
    pub mirror_epsilon: f32,
    /// Whether vertex picking accepts back-facing vertices
    pub allow_backface: bool,
    /// Viewport display options
    pub display: DisplayOptions,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            brush: BrushSettings::default(),
            mirror_mode: MirrorMode::None,
            mirror_epsilon: MIRROR_EPSILON,
            allow_backface: false,
            display: DisplayOptions::default(),
        }
    }
}

impl EditorSettings {
    /// Restore display options to their defaults
    pub fn reset_display_options(&mut self) {
        self.display = DisplayOptions::default();
    }

    /// Serialize settings to a RON string
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| EditError::Settings(e.to_string()))
    }

    /// Parse settings from a RON string
    pub fn from_ron(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| EditError::Settings(e.to_string()))
    }

    /// Save settings to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_ron()?;
        std::fs::write(path, content).map_err(|e| EditError::Settings(e.to_string()))?;
        tracing::debug!("Saved editor settings to {:?}", path);
        Ok(())
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EditError::Settings(e.to_string()))?;
        Self::from_ron(&content)
    }
}
