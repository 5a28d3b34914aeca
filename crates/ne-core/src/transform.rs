//! Normal transform operations
//!
//! Every operation blends by the per-vertex selection weight `s`. Vertices
//! with `s <= 0` are never written, and every written normal is renormalized.
//! If a blend collapses to a zero vector the previous normal is kept.

use glam::{Mat4, Quat, Vec3};

use crate::constants::EQUALIZE_EPSILON;
use crate::error::{Result, check_indices, check_len};
use crate::mesh::calculate_vertex_normals;
use crate::query::{self, Falloff, Ray};

/// Renormalize `candidate`, keeping `previous` when it has no direction
fn renormalize(candidate: Vec3, previous: Vec3) -> Vec3 {
    candidate.try_normalize().unwrap_or(previous)
}

/// Apply `op` to every selected normal, returning how many were edited
fn for_each_selected(
    normals: &mut [Vec3],
    selection: &[f32],
    mut op: impl FnMut(usize, Vec3, f32) -> Vec3,
) -> Result<usize> {
    check_len("selection", normals.len(), selection.len())?;

    let mut edited = 0;
    for (i, (n, &s)) in normals.iter_mut().zip(selection).enumerate() {
        if s > 0.0 {
            *n = renormalize(op(i, *n, s), *n);
            edited += 1;
        }
    }
    Ok(edited)
}

/// Offset selected normals: `normalize(n + delta * s)`
pub fn move_normals(normals: &mut [Vec3], selection: &[f32], delta: Vec3) -> Result<usize> {
    for_each_selected(normals, selection, |_, n, s| n + delta * s)
}

/// Rotate selected normals, blending toward the fully rotated normal by `s`
pub fn rotate_normals(normals: &mut [Vec3], selection: &[f32], rotation: Quat) -> Result<usize> {
    for_each_selected(normals, selection, |_, n, s| n.lerp(rotation * n, s))
}

/// Push selected normals away from `pivot`.
///
/// The direction from the pivot to each vertex is scaled per component by
/// `size` and added with weight `s`.
pub fn scale_normals(
    normals: &mut [Vec3],
    selection: &[f32],
    positions: &[Vec3],
    size: Vec3,
    pivot: Vec3,
) -> Result<usize> {
    check_len("positions", normals.len(), positions.len())?;
    for_each_selected(normals, selection, |i, n, s| {
        let dir = (positions[i] - pivot).normalize_or_zero() * size;
        n + dir * s
    })
}

/// Blend selected normals toward `clipboard` by `s`
pub fn paste_normals(normals: &mut [Vec3], selection: &[f32], clipboard: Vec3) -> Result<usize> {
    for_each_selected(normals, selection, |_, n, s| n.lerp(clipboard, s))
}

/// Smooth normals under a brush.
///
/// The ray is cast against the mesh; vertices within `radius` of the hit
/// point are blended toward the normalized average of their normals by
/// `(1 - d / radius)^falloff_power * strength` (clamped to [0, 1]). Returns
/// whether any normal actually moved.
#[allow(clippy::too_many_arguments)]
pub fn equalize_brush(
    ray: &Ray,
    positions: &[Vec3],
    indices: &[u32],
    radius: f32,
    falloff_power: f32,
    strength: f32,
    normals: &mut [Vec3],
    transform: &Mat4,
) -> Result<bool> {
    check_len("normals", positions.len(), normals.len())?;
    let Some(brush) = query::brush_hit(ray, positions, indices, radius, transform)? else {
        return Ok(false);
    };

    let average = brush
        .vertices
        .iter()
        .fold(Vec3::ZERO, |acc, &(i, _)| acc + normals[i])
        .normalize_or_zero();
    if average == Vec3::ZERO {
        return Ok(false);
    }

    let falloff = Falloff::new(falloff_power);
    let mut changed = false;
    for (i, distance) in brush.vertices {
        let w = (falloff.weight(distance, radius) * strength).clamp(0.0, 1.0);
        if w <= 0.0 {
            continue;
        }
        let previous = normals[i];
        let blended = renormalize(previous.lerp(average, w), previous);
        if (blended - previous).abs().max_element() > EQUALIZE_EPSILON {
            normals[i] = blended;
            changed = true;
        }
    }
    Ok(changed)
}

/// Recompute every normal from the mesh topology, ignoring selection.
///
/// Vertices not referenced by any non-degenerate triangle keep their current
/// normal.
pub fn reset_from_mesh(normals: &mut [Vec3], positions: &[Vec3], indices: &[u32]) -> Result<()> {
    check_len("normals", positions.len(), normals.len())?;
    check_indices(indices, positions.len())?;

    let computed = calculate_vertex_normals(positions, indices);
    for (n, c) in normals.iter_mut().zip(computed) {
        if c != Vec3::ZERO {
            *n = c;
        }
    }
    Ok(())
}
