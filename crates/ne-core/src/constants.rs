//! Global constants for ne-core

/// Maximum perpendicular distance between a pick ray and a vertex
pub const PICK_TOLERANCE: f32 = 0.05;

/// Epsilon for ray-triangle determinant and hit distance tests
pub const RAY_EPSILON: f32 = 1e-6;

/// Default distance tolerance when matching mirrored vertex positions
pub const MIRROR_EPSILON: f32 = 0.001;

/// Minimum per-component change for an equalize stroke to count as an edit
pub const EQUALIZE_EPSILON: f32 = 1e-6;

/// Default brush radius in world units
pub const DEFAULT_BRUSH_RADIUS: f32 = 0.2;

/// Default brush falloff exponent
pub const DEFAULT_BRUSH_POWER: f32 = 0.5;

/// Default brush strength
pub const DEFAULT_BRUSH_STRENGTH: f32 = 1.0;
