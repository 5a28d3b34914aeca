//! Normal map baking
//!
//! Two directions are supported:
//! - [`bake_to_texture`] rasterizes the mesh in UV space and writes each
//!   texel's interpolated normal, encoded as `n * 0.5 + 0.5`.
//! - [`bake_from_texture`] samples a normal map at every vertex UV and writes
//!   the decoded normals back into the normal array.
//!
//! Without a [`TangentBasis`] normals are stored in object space. With one,
//! they are expressed relative to the base normal/tangent frame of each
//! vertex, which is what a tangent-space normal map holds.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use image::{DynamicImage, Rgba, Rgba32FImage};

use crate::error::{EditError, Result, check_len};
use crate::mesh::{Mesh, calculate_tangents};

/// How normals are packed into texture channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalEncoding {
    /// RGB holds `n * 0.5 + 0.5`
    #[default]
    Rgb,
    /// Two-channel packing: X in alpha, Y in green, Z reconstructed
    Packed,
}

/// Per-vertex reference frame for tangent-space normals
#[derive(Debug, Clone, PartialEq)]
pub struct TangentBasis {
    /// Base (unedited) normals
    pub normals: Vec<Vec3>,
    /// Tangents with handedness in `w`
    pub tangents: Vec<Vec4>,
}

impl TangentBasis {
    /// Build a basis from the mesh UV layout and its base normals
    pub fn from_mesh(mesh: &Mesh, base_normals: &[Vec3]) -> Result<Self> {
        check_len("base normals", mesh.vertex_count(), base_normals.len())?;
        if !mesh.has_uvs() {
            return Err(EditError::InvalidInput(
                "tangent basis requires texture coordinates".into(),
            ));
        }
        let tangents = calculate_tangents(mesh.positions(), base_normals, mesh.uvs(), mesh.indices());
        Ok(Self {
            normals: base_normals.to_vec(),
            tangents,
        })
    }

    fn frame(&self, i: usize) -> (Vec3, Vec3, Vec3) {
        let n = self.normals[i];
        let t = self.tangents[i].truncate();
        let b = n.cross(t) * self.tangents[i].w;
        (t, b, n)
    }

    /// Express an object-space normal in the tangent frame of vertex `i`
    pub fn to_tangent_space(&self, i: usize, normal: Vec3) -> Vec3 {
        let (t, b, n) = self.frame(i);
        Vec3::new(normal.dot(t), normal.dot(b), normal.dot(n))
    }

    /// Convert a tangent-space normal of vertex `i` to object space
    pub fn to_object_space(&self, i: usize, normal: Vec3) -> Vec3 {
        let (t, b, n) = self.frame(i);
        t * normal.x + b * normal.y + n * normal.z
    }

    fn check(&self, vertex_count: usize) -> Result<()> {
        check_len("basis normals", vertex_count, self.normals.len())?;
        check_len("basis tangents", vertex_count, self.tangents.len())
    }
}

fn encode(n: Vec3) -> Vec3 {
    n * 0.5 + Vec3::splat(0.5)
}

fn decode(texel: Vec4, encoding: NormalEncoding) -> Vec3 {
    match encoding {
        NormalEncoding::Rgb => texel.truncate() * 2.0 - Vec3::ONE,
        NormalEncoding::Packed => {
            let x = texel.w * 2.0 - 1.0;
            let y = texel.y * 2.0 - 1.0;
            let z = (1.0 - x * x - y * y).max(0.0).sqrt();
            Vec3::new(x, y, z)
        }
    }
}

/// Write sampled normals into `normals`, renormalizing each.
///
/// Samples without direction leave the previous normal in place.
pub fn apply_sampled_normals(normals: &mut [Vec3], sampled: &[Vec3]) -> Result<()> {
    check_len("sampled normals", normals.len(), sampled.len())?;
    for (n, &s) in normals.iter_mut().zip(sampled) {
        if let Some(unit) = s.try_normalize() {
            *n = unit;
        }
    }
    Ok(())
}

/// Bilinear sample with clamp-to-edge addressing. UV (0, 0) is the
/// bottom-left corner of the image.
fn sample_bilinear(image: &Rgba32FImage, uv: Vec2) -> Vec4 {
    let (w, h) = image.dimensions();
    let x = uv.x * w as f32 - 0.5;
    let y = (1.0 - uv.y) * h as f32 - 0.5;

    let texel = |px: f32, py: f32| {
        let cx = (px as i64).clamp(0, w as i64 - 1) as u32;
        let cy = (py as i64).clamp(0, h as i64 - 1) as u32;
        Vec4::from_array(image.get_pixel(cx, cy).0)
    };

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let top = texel(x0, y0).lerp(texel(x0 + 1.0, y0), fx);
    let bottom = texel(x0, y0 + 1.0).lerp(texel(x0 + 1.0, y0 + 1.0), fx);
    top.lerp(bottom, fy)
}

/// Sample a normal map at every vertex UV and decode object-space normals
pub fn sample_normal_map(
    image: &Rgba32FImage,
    uvs: &[Vec2],
    encoding: NormalEncoding,
    basis: Option<&TangentBasis>,
) -> Result<Vec<Vec3>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(EditError::BakeFailed("normal map is empty".into()));
    }
    if let Some(basis) = basis {
        basis.check(uvs.len())?;
    }

    Ok(uvs
        .iter()
        .enumerate()
        .map(|(i, &uv)| {
            let n = decode(sample_bilinear(image, uv), encoding);
            match basis {
                Some(basis) => basis.to_object_space(i, n),
                None => n,
            }
        })
        .collect())
}

/// Replace `normals` with values sampled from the normal map at `path`.
///
/// Normals are left untouched if anything fails.
pub fn bake_from_texture(
    path: impl AsRef<Path>,
    uvs: &[Vec2],
    encoding: NormalEncoding,
    basis: Option<&TangentBasis>,
    normals: &mut [Vec3],
) -> Result<()> {
    let path = path.as_ref();
    check_len("uvs", normals.len(), uvs.len())?;
    if uvs.is_empty() {
        return Err(EditError::BakeFailed("mesh has no texture coordinates".into()));
    }

    let image = image::open(path)
        .map_err(|e| EditError::BakeFailed(format!("{}: {}", path.display(), e)))?
        .to_rgba32f();
    let sampled = sample_normal_map(&image, uvs, encoding, basis)?;
    apply_sampled_normals(normals, &sampled)?;

    tracing::info!(
        "Baked {} normals from {:?} ({}x{})",
        normals.len(),
        path,
        image.width(),
        image.height()
    );
    Ok(())
}

/// Rasterize normals into a `width` x `height` image in UV space.
///
/// Covered texels get alpha 1; uncovered texels hold a flat +Z normal with
/// alpha 0.
pub fn rasterize_normals(
    mesh: &Mesh,
    normals: &[Vec3],
    basis: Option<&TangentBasis>,
    width: u32,
    height: u32,
) -> Result<Rgba32FImage> {
    check_len("normals", mesh.vertex_count(), normals.len())?;
    if !mesh.has_uvs() {
        return Err(EditError::BakeFailed("mesh has no texture coordinates".into()));
    }
    if width == 0 || height == 0 {
        return Err(EditError::BakeFailed(format!(
            "invalid texture size {width}x{height}"
        )));
    }
    if let Some(basis) = basis {
        basis.check(mesh.vertex_count())?;
    }

    // Per-vertex value to interpolate (tangent-space when a basis is given)
    let values: Vec<Vec3> = normals
        .iter()
        .enumerate()
        .map(|(i, &n)| match basis {
            Some(basis) => basis.to_tangent_space(i, n),
            None => n,
        })
        .collect();

    let flat = encode(Vec3::Z);
    let mut image = Rgba32FImage::from_pixel(width, height, Rgba([flat.x, flat.y, flat.z, 0.0]));
    let size = Vec2::new(width as f32, height as f32);
    let to_pixel = |uv: Vec2| Vec2::new(uv.x, 1.0 - uv.y) * size;

    for t in 0..mesh.triangle_count() {
        let [i0, i1, i2] = mesh.triangle(t);
        let p0 = to_pixel(mesh.uvs()[i0]);
        let p1 = to_pixel(mesh.uvs()[i1]);
        let p2 = to_pixel(mesh.uvs()[i2]);

        let area = (p1 - p0).perp_dot(p2 - p0);
        if area.abs() < f32::EPSILON {
            continue;
        }

        let min = p0.min(p1).min(p2).floor().max(Vec2::ZERO);
        let max = p0.max(p1).max(p2).ceil().min(size);

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = (p1 - p).perp_dot(p2 - p) / area;
                let w1 = (p2 - p).perp_dot(p0 - p) / area;
                let w2 = 1.0 - w0 - w1;
                if w0 < -1e-6 || w1 < -1e-6 || w2 < -1e-6 {
                    continue;
                }

                let n = (values[i0] * w0 + values[i1] * w1 + values[i2] * w2).normalize_or_zero();
                if n == Vec3::ZERO {
                    continue;
                }
                let c = encode(n);
                image.put_pixel(x, y, Rgba([c.x, c.y, c.z, 1.0]));
            }
        }
    }

    Ok(image)
}

/// Bake normals into an image file.
///
/// `.png` paths are written as 8-bit RGBA; any other extension is written
/// with 32-bit float channels (e.g. `.exr`). In-memory normals are never
/// modified.
pub fn bake_to_texture(
    mesh: &Mesh,
    normals: &[Vec3],
    basis: Option<&TangentBasis>,
    width: u32,
    height: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(EditError::BakeFailed("output path is empty".into()));
    }

    let image = rasterize_normals(mesh, normals, basis, width, height)?;
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));

    let dynamic = DynamicImage::ImageRgba32F(image);
    let saved = if is_png {
        dynamic.to_rgba8().save(path)
    } else {
        dynamic.save(path)
    };
    saved.map_err(|e| EditError::BakeFailed(format!("{}: {}", path.display(), e)))?;

    tracing::info!("Baked normals to {:?} ({}x{})", path, width, height);
    Ok(())
}
