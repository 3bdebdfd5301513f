use rand::{Rng as _, SeedableRng as _};

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{lerp, mix_seed};

/// Floating-point crop rectangle in a photo's native pixel space.
///
/// The aspect ratio always equals the canvas aspect ratio, so resizing a
/// crop to the output strip never distorts.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl CropRect {
    /// Return `true` when the rectangle lies within `[0, nw] x [0, nh]`.
    ///
    /// A small epsilon absorbs floating-point noise at the far edges.
    pub fn contained_in(&self, nw: u32, nh: u32) -> bool {
        const EPS: f64 = 1e-6;
        self.x >= -EPS
            && self.y >= -EPS
            && self.x + self.width <= f64::from(nw) + EPS
            && self.y + self.height <= f64::from(nh) + EPS
    }
}

/// Start/end crop rectangle pair driving one photo's pan.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanCrop {
    /// Crop at the start of the photo's visible lifetime.
    pub start: CropRect,
    /// Crop at the end of the photo's visible lifetime.
    pub end: CropRect,
}

impl PanCrop {
    /// Component-wise linear interpolation at progress `alpha`, clamped to
    /// `[0, 1]`.
    ///
    /// Containment follows from the endpoints: `x + width` interpolates to
    /// `lerp(x1 + w1, x2 + w2)`, so the live rectangle never leaves the
    /// native bounds both endpoints satisfy.
    pub fn at(&self, alpha: f64) -> CropRect {
        let t = alpha.clamp(0.0, 1.0);
        CropRect {
            x: lerp(self.start.x, self.end.x, t),
            y: lerp(self.start.y, self.end.y, t),
            width: lerp(self.start.width, self.end.width, t),
            height: lerp(self.start.height, self.end.height, t),
        }
    }
}

/// Seeded pan-crop sampler.
///
/// Rectangles are a pure function of `(seed, entry_index, native size)`:
/// each call reconstructs a [`rand::rngs::StdRng`] from an FNV-mixed
/// per-entry seed, so a reload after eviction -- or a parallel worker on a
/// different thread -- reproduces identical rectangles.
#[derive(Clone, Copy, Debug)]
pub struct PanSampler {
    seed: u64,
    min_scale: f64,
    aspect: f64,
}

impl PanSampler {
    /// Create a sampler for a canvas with the given `width / height` aspect
    /// ratio.
    pub fn new(seed: u64, min_scale: f64, aspect: f64) -> ReelResult<Self> {
        if !min_scale.is_finite() || min_scale <= 0.0 || min_scale >= 1.0 {
            return Err(ReelError::validation("pan min_scale must be in (0, 1)"));
        }
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(ReelError::validation("pan aspect must be > 0"));
        }
        Ok(Self {
            seed,
            min_scale,
            aspect,
        })
    }

    /// Sample the start/end crop pair for the entry at `entry_index` with
    /// native size `(nw, nh)`.
    pub fn sample(&self, entry_index: u64, nw: u32, nh: u32) -> ReelResult<PanCrop> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(mix_seed(self.seed, entry_index));
        let start = self.sample_rect(&mut rng, nw, nh)?;
        let end = self.sample_rect(&mut rng, nw, nh)?;
        Ok(PanCrop { start, end })
    }

    /// Sample one crop rectangle fully inside `[0, nw) x [0, nh)`.
    ///
    /// The minor dimension is drawn uniformly from
    /// `[min_scale * min(nw, nh), hi)`, where `hi` is additionally bounded
    /// by the axis the major dimension is derived on. Without that bound a
    /// photo whose orientation opposes the canvas could yield a derived
    /// major dimension wider than the photo itself.
    fn sample_rect(&self, rng: &mut rand::rngs::StdRng, nw: u32, nh: u32) -> ReelResult<CropRect> {
        let nw_f = f64::from(nw);
        let nh_f = f64::from(nh);

        let hi = if self.aspect >= 1.0 {
            nh_f.min(nw_f / self.aspect)
        } else {
            nw_f.min(nh_f * self.aspect)
        };
        if hi < 1.0 {
            return Err(ReelError::render(format!(
                "photo {nw}x{nh} too small for a {:.4} aspect crop",
                self.aspect
            )));
        }

        let lo = (self.min_scale * nw_f.min(nh_f)).min(hi);
        let minor = if lo < hi { rng.random_range(lo..hi) } else { hi };

        let (width, height) = if self.aspect >= 1.0 {
            (minor * self.aspect, minor)
        } else {
            (minor, minor / self.aspect)
        };

        // Slack can round to a hair below zero when the crop spans a full axis.
        let x = rng.random_range(0.0..=(nw_f - width).max(0.0));
        let y = rng.random_range(0.0..=(nh_f - height).max(0.0));

        Ok(CropRect {
            x,
            y,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/pan.rs"]
mod tests;
