//! Mirror relation between symmetric vertices
//!
//! A mirror mode names a plane through the origin plus a direction: the plane
//! normal points toward the side that gets overwritten. Vertices on the other
//! (source) side are paired with their reflected counterparts, and edits are
//! propagated from source to destination by reflecting the normal.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result, check_len};

/// Mirroring direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MirrorMode {
    /// Mirroring disabled
    #[default]
    None,
    /// Copy the +X side onto the -X side
    RightToLeft,
    /// Copy the -X side onto the +X side
    LeftToRight,
    /// Copy the +Z side onto the -Z side
    ForwardToBack,
    /// Copy the -Z side onto the +Z side
    BackToForward,
    /// Copy the +Y side onto the -Y side
    UpToDown,
    /// Copy the -Y side onto the +Y side
    DownToUp,
}

/// Axis-aligned mirror plane through the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorAxis {
    /// The YZ plane
    X,
    /// The XZ plane
    Y,
    /// The XY plane
    Z,
}

impl MirrorMode {
    /// All modes that actually mirror
    pub const ACTIVE: [MirrorMode; 6] = [
        MirrorMode::RightToLeft,
        MirrorMode::LeftToRight,
        MirrorMode::ForwardToBack,
        MirrorMode::BackToForward,
        MirrorMode::UpToDown,
        MirrorMode::DownToUp,
    ];

    /// Plane normal, pointing at the destination side (`None` when disabled)
    pub fn plane_normal(&self) -> Option<Vec3> {
        match self {
            MirrorMode::None => None,
            MirrorMode::RightToLeft => Some(Vec3::NEG_X),
            MirrorMode::LeftToRight => Some(Vec3::X),
            MirrorMode::ForwardToBack => Some(Vec3::NEG_Z),
            MirrorMode::BackToForward => Some(Vec3::Z),
            MirrorMode::UpToDown => Some(Vec3::NEG_Y),
            MirrorMode::DownToUp => Some(Vec3::Y),
        }
    }

    /// The plane this mode mirrors across; opposite directions share one
    pub fn axis(&self) -> Option<MirrorAxis> {
        match self {
            MirrorMode::None => None,
            MirrorMode::RightToLeft | MirrorMode::LeftToRight => Some(MirrorAxis::X),
            MirrorMode::UpToDown | MirrorMode::DownToUp => Some(MirrorAxis::Y),
            MirrorMode::ForwardToBack | MirrorMode::BackToForward => Some(MirrorAxis::Z),
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            MirrorMode::None => "None",
            MirrorMode::RightToLeft => "Right to Left",
            MirrorMode::LeftToRight => "Left to Right",
            MirrorMode::ForwardToBack => "Forward to Back",
            MirrorMode::BackToForward => "Back to Forward",
            MirrorMode::UpToDown => "Up to Down",
            MirrorMode::DownToUp => "Down to Up",
        }
    }
}

/// Reflect `v` across the plane through the origin with unit normal `n`
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - n * (2.0 * v.dot(n))
}

/// Per-vertex mirror counterparts
///
/// `Some(j)` means vertex `i` writes its reflected normal into `j`
/// (`Some(i)` for vertices lying on the plane). `None` marks vertices with no
/// counterpart and vertices on the destination side.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorRelation {
    counterparts: Vec<Option<u32>>,
}

impl MirrorRelation {
    /// Counterpart of vertex `i`
    pub fn counterpart(&self, i: usize) -> Option<usize> {
        self.counterparts.get(i).copied().flatten().map(|j| j as usize)
    }

    /// Number of vertices covered by the relation
    pub fn len(&self) -> usize {
        self.counterparts.len()
    }

    /// Whether the relation covers no vertices
    pub fn is_empty(&self) -> bool {
        self.counterparts.is_empty()
    }

    /// Number of source vertices paired with a different vertex
    pub fn pair_count(&self) -> usize {
        self.pairs().count()
    }

    /// Iterate `(source, destination)` pairs, skipping self-mapped vertices
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counterparts
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|j| (i, j as usize)))
            .filter(|(i, j)| i != j)
    }
}

/// Build the mirror relation for `positions` (model space).
///
/// Vertices within `epsilon` of the plane map to themselves. Each vertex on
/// the source side (`dot(p, n) < -epsilon`) is paired with a vertex within
/// `epsilon` of its reflection. When several vertices share that position
/// (split normals), the one whose base normal best matches the reflected
/// source normal wins, and each destination is claimed at most once. Fails
/// with [`EditError::NotSymmetric`] when no pair is found at all.
pub fn build_relation(
    positions: &[Vec3],
    base_normals: &[Vec3],
    plane_normal: Vec3,
    epsilon: f32,
) -> Result<MirrorRelation> {
    check_len("base normals", positions.len(), base_normals.len())?;
    let n = plane_normal
        .try_normalize()
        .ok_or_else(|| EditError::InvalidInput("mirror plane normal is zero".into()))?;
    let epsilon_sq = epsilon * epsilon;

    let mut claimed = vec![false; positions.len()];
    let mut counterparts: Vec<Option<u32>> = vec![None; positions.len()];

    for (i, &p) in positions.iter().enumerate() {
        let side = p.dot(n);
        if side.abs() <= epsilon {
            counterparts[i] = Some(i as u32);
            continue;
        }
        if side > 0.0 {
            continue;
        }

        let target = reflect(p, n);
        let expected = reflect(base_normals[i], n);
        // Best normal match first, then nearest, then lowest index
        let best = positions
            .iter()
            .enumerate()
            .filter(|&(j, _)| !claimed[j])
            .filter_map(|(j, &q)| {
                let d = q.distance_squared(target);
                (d <= epsilon_sq).then(|| (j, base_normals[j].dot(expected), d))
            })
            .min_by(|a, b| b.1.total_cmp(&a.1).then(a.2.total_cmp(&b.2)));

        if let Some((j, _, _)) = best {
            claimed[j] = true;
            counterparts[i] = Some(j as u32);
        }
    }

    let relation = MirrorRelation { counterparts };
    let pairs = relation.pair_count();
    tracing::debug!(
        "Built mirror relation: {} vertices, {} pairs",
        relation.len(),
        pairs
    );
    if pairs == 0 {
        return Err(EditError::NotSymmetric);
    }
    Ok(relation)
}

/// Propagate normals across the mirror plane.
///
/// For each pair `(i, j)`, `normals[j]` becomes the reflection of
/// `normals[i]`. Self-mapped and unpaired vertices are untouched. Returns the
/// number of normals written.
pub fn apply_mirroring(relation: &MirrorRelation, plane_normal: Vec3, normals: &mut [Vec3]) -> Result<usize> {
    check_len("normals", relation.len(), normals.len())?;
    let n = plane_normal.normalize_or_zero();

    let mut written = 0;
    for (i, j) in relation.pairs() {
        normals[j] = reflect(normals[i], n).try_normalize().unwrap_or(normals[j]);
        written += 1;
    }
    Ok(written)
}

/// Cached relation and the mode it was built for
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRelation {
    /// Mode the relation was built with
    pub mode: MirrorMode,
    /// The relation itself
    pub relation: MirrorRelation,
}

/// Lazily built mirror relation, rebuilt whenever the mode changes
#[derive(Debug, Clone, Default)]
pub struct MirrorCache {
    cached: Option<CachedRelation>,
}

impl MirrorCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached relation (mesh changed)
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Mode of the currently cached relation, if any
    pub fn cached_mode(&self) -> Option<MirrorMode> {
        self.cached.as_ref().map(|c| c.mode)
    }

    /// Return the relation for `mode`, building it if the key differs.
    ///
    /// `base_normals` only disambiguate coincident vertices. A failed build
    /// leaves the cache empty.
    pub fn get_or_build(
        &mut self,
        mode: MirrorMode,
        positions: &[Vec3],
        base_normals: &[Vec3],
        epsilon: f32,
    ) -> Result<&MirrorRelation> {
        let plane_normal = mode
            .plane_normal()
            .ok_or_else(|| EditError::InvalidInput("mirror mode is None".into()))?;

        if self.cached_mode() != Some(mode) {
            self.cached = None;
            let relation = build_relation(positions, base_normals, plane_normal, epsilon)?;
            self.cached = Some(CachedRelation { mode, relation });
        }

        match &self.cached {
            Some(cached) => Ok(&cached.relation),
            None => Err(EditError::NotSymmetric),
        }
    }
}
