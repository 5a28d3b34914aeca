//! Editing session
//!
//! [`EditSession`] ties a mesh, its model transform, the editor settings and
//! the mirror cache together. The caller keeps ownership of the normal and
//! selection arrays and passes them to each call; the session validates
//! their lengths against the mesh before touching anything.
//!
//! The session also keeps the mesh's base normals (the imported ones, or the
//! topology normals when none were supplied). They define the tangent frame
//! for tangent-space maps and tell coincident vertices apart when mirroring.
//!
//! Every normal edit is followed by mirroring when a mirror mode is active.
//! If the mesh turns out not to be symmetric, a warning is logged and
//! mirroring is switched off.

use std::path::Path;

use glam::{Mat4, Quat, Vec3};

use crate::bake::{self, NormalEncoding, TangentBasis};
use crate::error::{EditError, Result, check_len};
use crate::mesh::Mesh;
use crate::mirror::{self, MirrorCache, MirrorMode};
use crate::query::{self, Ray, RayHit, ScreenRect};
use crate::selection::{self, SelectionSummary};
use crate::settings::{BrushSettings, EditorSettings};
use crate::transform;

/// Editing context for one mesh
#[derive(Debug, Clone)]
pub struct EditSession {
    mesh: Mesh,
    base_normals: Vec<Vec3>,
    transform: Mat4,
    mirror: MirrorCache,
    settings: EditorSettings,
    clipboard: Vec3,
}

impl EditSession {
    /// Create a session for `mesh` with default settings and identity transform
    pub fn new(mesh: Mesh) -> Self {
        Self::with_settings(mesh, EditorSettings::default())
    }

    /// Create a session with explicit settings
    pub fn with_settings(mesh: Mesh, settings: EditorSettings) -> Self {
        Self {
            base_normals: topology_normals(&mesh),
            mesh,
            transform: Mat4::IDENTITY,
            mirror: MirrorCache::new(),
            settings,
            clipboard: Vec3::Z,
        }
    }

    /// Use `normals` as the base normals instead of the topology normals
    pub fn with_base_normals(mut self, normals: Vec<Vec3>) -> Result<Self> {
        self.set_base_normals(normals)?;
        Ok(self)
    }

    // ============== Accessors ==============

    /// The edited mesh
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Model-to-world transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Base normals used for tangent frames and mirror pairing
    pub fn base_normals(&self) -> &[Vec3] {
        &self.base_normals
    }

    /// Current settings
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Normal stored by the last copy
    pub fn clipboard(&self) -> Vec3 {
        self.clipboard
    }

    /// Mode of the cached mirror relation, if one is built
    pub fn cached_mirror_mode(&self) -> Option<MirrorMode> {
        self.mirror.cached_mode()
    }

    /// Replace the model transform
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Replace all settings. The mirror cache is dropped since the epsilon
    /// may have changed.
    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.settings = settings;
        self.mirror.invalidate();
    }

    /// Replace the brush parameters
    pub fn set_brush(&mut self, brush: BrushSettings) {
        self.settings.brush = brush;
    }

    /// Switch mirror mode. The relation is built lazily on the next edit.
    pub fn set_mirror_mode(&mut self, mode: MirrorMode) {
        if self.settings.mirror_mode != mode {
            tracing::debug!("Mirror mode set to {}", mode.name());
        }
        self.settings.mirror_mode = mode;
    }

    /// Replace the base normals. Zero-length entries fall back to +Z.
    pub fn set_base_normals(&mut self, normals: Vec<Vec3>) -> Result<()> {
        self.check_normals(&normals)?;
        self.base_normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Z))
            .collect();
        self.mirror.invalidate();
        Ok(())
    }

    /// Swap in a new mesh, dropping the cached mirror relation. Base normals
    /// are recomputed from the new topology.
    pub fn replace_mesh(&mut self, mesh: Mesh) {
        self.base_normals = topology_normals(&mesh);
        self.mesh = mesh;
        self.mirror.invalidate();
    }

    fn check_normals(&self, normals: &[Vec3]) -> Result<()> {
        check_len("normals", self.mesh.vertex_count(), normals.len())
    }

    fn check_selection(&self, selection: &[f32]) -> Result<()> {
        check_len("selection", self.mesh.vertex_count(), selection.len())
    }

    // ============== Queries ==============

    /// Closest triangle hit by a world-space ray
    pub fn raycast(&self, ray: &Ray) -> Result<Option<RayHit>> {
        query::raycast(ray, self.mesh.positions(), self.mesh.indices(), &self.transform)
    }

    /// Vertex under the pick ray, honoring `allow_backface`
    pub fn pick_vertex(&self, ray: &Ray, normals: &[Vec3]) -> Result<Option<usize>> {
        self.check_normals(normals)?;
        query::nearest_vertex(
            ray,
            self.mesh.positions(),
            normals,
            &self.transform,
            self.settings.allow_backface,
        )
    }

    /// Weighted centroid, average normal and gizmo pivot of the selection
    pub fn selection_summary(&self, normals: &[Vec3], selection: &[f32]) -> Result<SelectionSummary> {
        selection::selection_summary(self.mesh.positions(), normals, selection, &self.transform)
    }

    // ============== Selection ==============

    /// Select every vertex
    pub fn select_all(&self, selection: &mut [f32]) -> Result<bool> {
        self.check_selection(selection)?;
        Ok(selection::select_all(selection))
    }

    /// Clear the selection
    pub fn select_none(&self, selection: &mut [f32]) -> Result<bool> {
        self.check_selection(selection)?;
        Ok(selection::select_none(selection))
    }

    /// Soft brush stroke using the current brush settings
    pub fn select_soft(&self, ray: &Ray, selection: &mut [f32]) -> Result<bool> {
        let brush = self.settings.brush;
        selection::soft_select(
            ray,
            self.mesh.positions(),
            self.mesh.indices(),
            brush.radius,
            brush.falloff_power,
            brush.strength,
            &self.transform,
            selection,
        )
    }

    /// Hard brush stroke using the current brush settings
    pub fn select_hard(&self, ray: &Ray, selection: &mut [f32]) -> Result<bool> {
        let brush = self.settings.brush;
        selection::hard_select(
            ray,
            self.mesh.positions(),
            self.mesh.indices(),
            brush.radius,
            brush.strength,
            &self.transform,
            selection,
        )
    }

    /// Rectangle selection. `view_projection` excludes the model transform,
    /// which the session applies itself.
    pub fn select_rect(&self, view_projection: &Mat4, rect: ScreenRect, selection: &mut [f32]) -> Result<bool> {
        let mvp = *view_projection * self.transform;
        selection::rect_select(self.mesh.positions(), &mvp, rect.min, rect.max, selection)
    }

    // ============== Normal edits ==============

    /// Offset selected normals by `delta`
    pub fn apply_move(&mut self, normals: &mut [Vec3], selection: &[f32], delta: Vec3) -> Result<usize> {
        self.check_normals(normals)?;
        let edited = transform::move_normals(normals, selection, delta)?;
        self.mirror_after_edit(edited > 0, normals)?;
        Ok(edited)
    }

    /// Rotate selected normals
    pub fn apply_rotation(&mut self, normals: &mut [Vec3], selection: &[f32], rotation: Quat) -> Result<usize> {
        self.check_normals(normals)?;
        let edited = transform::rotate_normals(normals, selection, rotation)?;
        self.mirror_after_edit(edited > 0, normals)?;
        Ok(edited)
    }

    /// Push selected normals away from `pivot`, scaled per axis by `size`
    pub fn apply_scale(
        &mut self,
        normals: &mut [Vec3],
        selection: &[f32],
        size: Vec3,
        pivot: Vec3,
    ) -> Result<usize> {
        let edited = transform::scale_normals(normals, selection, self.mesh.positions(), size, pivot)?;
        self.mirror_after_edit(edited > 0, normals)?;
        Ok(edited)
    }

    /// Store a normal for later pasting
    pub fn set_clipboard(&mut self, normal: Vec3) -> Result<()> {
        self.clipboard = normal
            .try_normalize()
            .ok_or_else(|| EditError::InvalidInput("clipboard normal has zero length".into()))?;
        Ok(())
    }

    /// Copy the average normal of the selection into the clipboard.
    ///
    /// Returns `false` (clipboard untouched) when nothing is selected or the
    /// selected normals cancel out.
    pub fn copy_selection(&mut self, normals: &[Vec3], selection: &[f32]) -> Result<bool> {
        let summary = self.selection_summary(normals, selection)?;
        if summary.is_empty() || summary.normal == Vec3::ZERO {
            return Ok(false);
        }
        self.clipboard = summary.normal;
        Ok(true)
    }

    /// Blend selected normals toward the clipboard normal
    pub fn apply_paste(&mut self, normals: &mut [Vec3], selection: &[f32]) -> Result<usize> {
        self.check_normals(normals)?;
        let edited = transform::paste_normals(normals, selection, self.clipboard)?;
        self.mirror_after_edit(edited > 0, normals)?;
        Ok(edited)
    }

    /// Equalize brush stroke using the current brush settings
    pub fn apply_equalize_brush(&mut self, ray: &Ray, normals: &mut [Vec3]) -> Result<bool> {
        let brush = self.settings.brush;
        let changed = transform::equalize_brush(
            ray,
            self.mesh.positions(),
            self.mesh.indices(),
            brush.radius,
            brush.falloff_power,
            brush.strength,
            normals,
            &self.transform,
        )?;
        self.mirror_after_edit(changed, normals)?;
        Ok(changed)
    }

    /// Recompute every normal from the mesh
    pub fn reset_normals(&self, normals: &mut [Vec3]) -> Result<()> {
        transform::reset_from_mesh(normals, self.mesh.positions(), self.mesh.indices())
    }

    // ============== Mirroring ==============

    fn mirror_after_edit(&mut self, changed: bool, normals: &mut [Vec3]) -> Result<()> {
        if changed {
            self.apply_mirroring(normals)?;
        }
        Ok(())
    }

    /// Propagate normals across the active mirror plane.
    ///
    /// Returns the number of normals written (0 when mirroring is off). When
    /// the mesh has no mirrored pairs the mode is reset to
    /// [`MirrorMode::None`] and the call succeeds with 0.
    pub fn apply_mirroring(&mut self, normals: &mut [Vec3]) -> Result<usize> {
        let mode = self.settings.mirror_mode;
        let Some(plane_normal) = mode.plane_normal() else {
            return Ok(0);
        };
        self.check_normals(normals)?;

        let epsilon = self.settings.mirror_epsilon;
        match self
            .mirror
            .get_or_build(mode, self.mesh.positions(), &self.base_normals, epsilon)
        {
            Ok(relation) => mirror::apply_mirroring(relation, plane_normal, normals),
            Err(EditError::NotSymmetric) => {
                tracing::warn!(
                    "Mesh is not symmetric for mirror mode '{}', disabling mirroring",
                    mode.name()
                );
                self.settings.mirror_mode = MirrorMode::None;
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    // ============== Baking ==============

    /// Base frame for tangent-space maps
    pub fn tangent_basis(&self) -> Result<TangentBasis> {
        TangentBasis::from_mesh(&self.mesh, &self.base_normals)
    }

    fn basis_for(&self, tangent_space: bool) -> Result<Option<TangentBasis>> {
        if !tangent_space {
            return Ok(None);
        }
        self.tangent_basis()
            .map(Some)
            .map_err(|e| EditError::BakeFailed(e.to_string()))
    }

    /// Write the normals into a texture file
    pub fn bake_to_texture(
        &self,
        normals: &[Vec3],
        width: u32,
        height: u32,
        tangent_space: bool,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let basis = self.basis_for(tangent_space)?;
        bake::bake_to_texture(&self.mesh, normals, basis.as_ref(), width, height, path)
    }

    /// Replace the normals with values sampled from a normal map
    pub fn bake_from_texture(
        &self,
        path: impl AsRef<Path>,
        encoding: NormalEncoding,
        tangent_space: bool,
        normals: &mut [Vec3],
    ) -> Result<()> {
        self.check_normals(normals)?;
        let basis = self.basis_for(tangent_space)?;
        bake::bake_from_texture(path, self.mesh.uvs(), encoding, basis.as_ref(), normals)
    }
}

/// Topology normals, with +Z for vertices no triangle covers
fn topology_normals(mesh: &Mesh) -> Vec<Vec3> {
    mesh.vertex_normals()
        .into_iter()
        .map(|n| if n == Vec3::ZERO { Vec3::Z } else { n })
        .collect()
}
