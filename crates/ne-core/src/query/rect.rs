//! Screen-space rectangle containment

use glam::{Mat4, Vec2, Vec3};

/// Rectangle in normalized device coordinates ([-1, 1] on both axes, +Y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl ScreenRect {
    /// Create a rectangle from any two opposite NDC corners
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a rectangle from two pixel corners of a drag.
    ///
    /// Pixel coordinates have their origin at the top-left of a viewport of
    /// `viewport` pixels, so Y is flipped during the conversion.
    pub fn from_pixels(start: Vec2, end: Vec2, viewport: Vec2) -> Self {
        let to_ndc = |p: Vec2| {
            Vec2::new(
                p.x / viewport.x * 2.0 - 1.0,
                (1.0 - p.y / viewport.y) * 2.0 - 1.0,
            )
        };
        Self::new(to_ndc(start), to_ndc(end))
    }

    /// Whether an NDC point lies inside (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Indices of vertices whose projection falls inside a rectangle.
///
/// Each position is projected through `mvp` (model-view-projection). Vertices
/// behind the camera (clip `w <= 0`) are never inside.
pub fn rect_containment(positions: &[Vec3], mvp: &Mat4, rect_min: Vec2, rect_max: Vec2) -> Vec<usize> {
    let rect = ScreenRect {
        min: rect_min,
        max: rect_max,
    };

    positions
        .iter()
        .enumerate()
        .filter_map(|(i, &p)| {
            let clip = *mvp * p.extend(1.0);
            if clip.w <= 0.0 {
                return None;
            }
            let ndc = Vec2::new(clip.x, clip.y) / clip.w;
            rect.contains(ndc).then_some(i)
        })
        .collect()
}
