//! Per-vertex selection weights
//!
//! A selection array holds one weight in [0, 1] per vertex. Brush and
//! rectangle selections only ever add to (or, with negative strength,
//! subtract from) the existing weights and always clamp the result.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::error::{Result, check_len};
use crate::query::{self, Falloff, Ray};

/// Set every weight to 1.0. Returns whether the array is non-empty.
pub fn select_all(selection: &mut [f32]) -> bool {
    selection.fill(1.0);
    !selection.is_empty()
}

/// Set every weight to 0.0. Returns whether the array is non-empty.
pub fn select_none(selection: &mut [f32]) -> bool {
    selection.fill(0.0);
    !selection.is_empty()
}

/// Write `value` clamped to [0, 1], reporting whether the weight changed
fn set_weight(weight: &mut f32, value: f32) -> bool {
    let clamped = value.clamp(0.0, 1.0);
    if *weight == clamped {
        false
    } else {
        *weight = clamped;
        true
    }
}

/// Soft brush selection.
///
/// The ray is cast against the mesh and every vertex within `radius` of the
/// hit point receives `(1 - d / radius)^falloff_power * strength`, added to
/// its current weight and clamped to [0, 1]. A negative `strength` erases.
/// Returns whether any weight changed; a miss changes nothing.
#[allow(clippy::too_many_arguments)]
pub fn soft_select(
    ray: &Ray,
    positions: &[Vec3],
    indices: &[u32],
    radius: f32,
    falloff_power: f32,
    strength: f32,
    transform: &Mat4,
    selection: &mut [f32],
) -> Result<bool> {
    check_len("selection", positions.len(), selection.len())?;
    let Some(brush) = query::brush_hit(ray, positions, indices, radius, transform)? else {
        return Ok(false);
    };

    let falloff = Falloff::new(falloff_power);
    let mut changed = false;
    for (i, distance) in brush.vertices {
        let current = selection[i];
        let w = falloff.weight(distance, radius) * strength;
        changed |= set_weight(&mut selection[i], current + w);
    }
    Ok(changed)
}

/// Hard brush selection: vertices within `radius` of the hit point get
/// `strength` (clamped to [0, 1]) with no falloff.
pub fn hard_select(
    ray: &Ray,
    positions: &[Vec3],
    indices: &[u32],
    radius: f32,
    strength: f32,
    transform: &Mat4,
    selection: &mut [f32],
) -> Result<bool> {
    check_len("selection", positions.len(), selection.len())?;
    let Some(brush) = query::brush_hit(ray, positions, indices, radius, transform)? else {
        return Ok(false);
    };

    let mut changed = false;
    for (i, _) in brush.vertices {
        changed |= set_weight(&mut selection[i], strength);
    }
    Ok(changed)
}

/// Additive rectangle selection: vertices projecting inside the rectangle
/// are fully selected, the rest keep their weight.
pub fn rect_select(
    positions: &[Vec3],
    mvp: &Mat4,
    rect_min: Vec2,
    rect_max: Vec2,
    selection: &mut [f32],
) -> Result<bool> {
    check_len("selection", positions.len(), selection.len())?;

    let mut changed = false;
    for i in query::rect_containment(positions, mvp, rect_min, rect_max) {
        changed |= set_weight(&mut selection[i], 1.0);
    }
    Ok(changed)
}

/// Weighted summary of the current selection, used to place gizmos
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSummary {
    /// Number of vertices with weight > 0
    pub count: usize,
    /// Weighted average position (model space)
    pub centroid: Vec3,
    /// Weighted average normal, normalized (zero when it cancels out)
    pub normal: Vec3,
    /// Centroid in world space
    pub pivot_position: Vec3,
    /// Rotation taking +Z onto the average normal
    pub pivot_rotation: Quat,
}

impl Default for SelectionSummary {
    fn default() -> Self {
        Self {
            count: 0,
            centroid: Vec3::ZERO,
            normal: Vec3::ZERO,
            pivot_position: Vec3::ZERO,
            pivot_rotation: Quat::IDENTITY,
        }
    }
}

impl SelectionSummary {
    /// Whether anything is selected
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Compute the weighted centroid and average normal of selected vertices
pub fn selection_summary(
    positions: &[Vec3],
    normals: &[Vec3],
    selection: &[f32],
    transform: &Mat4,
) -> Result<SelectionSummary> {
    check_len("normals", positions.len(), normals.len())?;
    check_len("selection", positions.len(), selection.len())?;

    let mut count = 0;
    let mut total = 0.0;
    let mut pos_sum = Vec3::ZERO;
    let mut normal_sum = Vec3::ZERO;

    for ((&p, &n), &s) in positions.iter().zip(normals).zip(selection) {
        if s > 0.0 {
            pos_sum += p * s;
            normal_sum += n * s;
            total += s;
            count += 1;
        }
    }

    if count == 0 {
        return Ok(SelectionSummary::default());
    }

    let centroid = pos_sum / total;
    let normal = (normal_sum / total).normalize_or_zero();
    let pivot_rotation = if normal == Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_arc(Vec3::Z, normal)
    };

    Ok(SelectionSummary {
        count,
        centroid,
        normal,
        pivot_position: transform.transform_point3(centroid),
        pivot_rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitive::generate_grid_mesh;

    fn grid() -> (Vec<Vec3>, Vec<u32>) {
        let (mesh, _) = generate_grid_mesh(10, 1.0);
        (mesh.positions().to_vec(), mesh.indices().to_vec())
    }

    fn down_ray(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 1.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_select_all_none() {
        let mut selection = vec![0.0, 0.5, 1.0];
        assert!(select_all(&mut selection));
        assert_eq!(selection, vec![1.0; 3]);
        assert!(select_none(&mut selection));
        assert_eq!(selection, vec![0.0; 3]);

        let mut empty: Vec<f32> = Vec::new();
        assert!(!select_all(&mut empty));
        assert!(!select_none(&mut empty));
    }

    #[test]
    fn test_soft_select_falloff() {
        let (positions, indices) = grid();
        let mut selection = vec![0.0; positions.len()];

        let changed = soft_select(
            &down_ray(0.0, 0.0),
            &positions,
            &indices,
            0.25,
            1.0,
            1.0,
            &Mat4::IDENTITY,
            &mut selection,
        )
        .unwrap();
        assert!(changed);

        // Center vertex (index 60 on an 11x11 grid) is fully selected
        assert!((selection[60] - 1.0).abs() < 1e-5);
        // Neighbor at 0.1 gets 1 - 0.1 / 0.25
        assert!((selection[61] - 0.6).abs() < 1e-5);
        // Far corner untouched
        assert_eq!(selection[0], 0.0);
        assert!(selection.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_soft_select_accumulates_and_clamps() {
        let (positions, indices) = grid();
        let mut selection = vec![0.0; positions.len()];
        for _ in 0..5 {
            soft_select(
                &down_ray(0.0, 0.0),
                &positions,
                &indices,
                0.25,
                1.0,
                0.5,
                &Mat4::IDENTITY,
                &mut selection,
            )
            .unwrap();
        }
        assert_eq!(selection[60], 1.0);
        assert!(selection.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_soft_select_negative_strength_erases() {
        let (positions, indices) = grid();
        let mut selection = vec![1.0; positions.len()];
        let changed = soft_select(
            &down_ray(0.0, 0.0),
            &positions,
            &indices,
            0.25,
            1.0,
            -1.0,
            &Mat4::IDENTITY,
            &mut selection,
        )
        .unwrap();
        assert!(changed);
        assert!(selection[60] < 1e-5);
        assert_eq!(selection[0], 1.0);
    }

    #[test]
    fn test_soft_select_miss_is_noop() {
        let (positions, indices) = grid();
        let mut selection = vec![0.25; positions.len()];
        let changed = soft_select(
            &down_ray(5.0, 5.0),
            &positions,
            &indices,
            0.25,
            1.0,
            1.0,
            &Mat4::IDENTITY,
            &mut selection,
        )
        .unwrap();
        assert!(!changed);
        assert!(selection.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_hard_select_sets_strength() {
        let (positions, indices) = grid();
        let mut selection = vec![0.0; positions.len()];
        let changed = hard_select(
            &down_ray(0.0, 0.0),
            &positions,
            &indices,
            0.15,
            0.7,
            &Mat4::IDENTITY,
            &mut selection,
        )
        .unwrap();
        assert!(changed);
        assert_eq!(selection[60], 0.7);
        assert_eq!(selection[61], 0.7);
        assert_eq!(selection[62], 0.0);

        // Repeating the same stroke changes nothing
        let changed = hard_select(
            &down_ray(0.0, 0.0),
            &positions,
            &indices,
            0.15,
            0.7,
            &Mat4::IDENTITY,
            &mut selection,
        )
        .unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_hard_select_clamps_strength() {
        let (positions, indices) = grid();
        let mut selection = vec![0.0; positions.len()];
        hard_select(
            &down_ray(0.0, 0.0),
            &positions,
            &indices,
            0.15,
            3.0,
            &Mat4::IDENTITY,
            &mut selection,
        )
        .unwrap();
        assert_eq!(selection[60], 1.0);
    }

    #[test]
    fn test_rect_select_is_additive() {
        let positions = vec![Vec3::ZERO, Vec3::new(0.9, 0.9, 0.0), Vec3::new(-0.9, 0.0, 0.0)];
        let mut selection = vec![0.0, 0.0, 0.4];
        let changed = rect_select(
            &positions,
            &Mat4::IDENTITY,
            Vec2::splat(-0.5),
            Vec2::splat(0.5),
            &mut selection,
        )
        .unwrap();
        assert!(changed);
        assert_eq!(selection, vec![1.0, 0.0, 0.4]);
    }

    #[test]
    fn test_selection_length_mismatch_does_not_mutate() {
        let (positions, indices) = grid();
        let mut selection = vec![0.0; 3];
        let result = soft_select(
            &down_ray(0.0, 0.0),
            &positions,
            &indices,
            0.25,
            1.0,
            1.0,
            &Mat4::IDENTITY,
            &mut selection,
        );
        assert!(result.is_err());
        assert_eq!(selection, vec![0.0; 3]);
    }

    #[test]
    fn test_selection_summary_weighted() {
        let positions = vec![Vec3::ZERO, Vec3::X * 2.0, Vec3::Y];
        let normals = vec![Vec3::Z, Vec3::Z, Vec3::X];
        let selection = vec![1.0, 1.0, 0.0];
        let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, 1.0));

        let summary = selection_summary(&positions, &normals, &selection, &transform).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.centroid, Vec3::X);
        assert_eq!(summary.normal, Vec3::Z);
        assert_eq!(summary.pivot_position, Vec3::new(1.0, 0.0, 1.0));
        assert!((summary.pivot_rotation * Vec3::Z - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_selection_summary_empty() {
        let positions = vec![Vec3::ZERO];
        let summary = selection_summary(&positions, &[Vec3::Z], &[0.0], &Mat4::IDENTITY).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.normal, Vec3::ZERO);
    }

    #[test]
    fn test_hard_select_negative_radius_selects_nothing() {
        let (positions, indices) = grid();
        let mut selection = vec![0.0; positions.len()];
        let changed = hard_select(
            &down_ray(0.0, 0.0),
            &positions,
            &indices,
            -0.3,
            1.0,
            &Mat4::IDENTITY,
            &mut selection,
        )
        .unwrap();
        assert!(!changed);
        assert!(selection.iter().all(|&s| s == 0.0));
    }
}
