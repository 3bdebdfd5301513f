use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// How far the mosaic slides over the course of the render.
///
/// The two policies differ in whether the trailing endcap is held fully
/// onscreen at the end of playback or only reached mid-transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlidePolicy {
    /// `slide = total_length - major_dim`: playback ends with the trailing
    /// endcap's far edge flush with the canvas's far edge.
    #[default]
    OneCanvas,
    /// `slide = total_length - 2 * major_dim`: both endcaps are fully
    /// onscreen at their respective ends of playback.
    TwoCanvas,
}

/// Renderer configuration.
///
/// Construct via [`ReelConfig::default`] and adjust fields, or load from a
/// JSON file with [`ReelConfig::from_path`]. Call [`ReelConfig::validate`]
/// before rendering; [`crate::RenderSession::new`] does so as well.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Output canvas dimensions. Both must be even (yuv420p requirement).
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Minimum pan-crop scale as a fraction of the photo's smaller native
    /// dimension, in `(0, 1)`.
    pub min_scale: f64,
    /// Slide-distance policy.
    pub slide: SlidePolicy,
    /// Seed for pan-crop rectangle sampling. Identical seeds reproduce
    /// identical rectangles.
    pub seed: u64,
    /// Canvas clear color (straight RGBA8), visible behind endcaps and
    /// skipped entries.
    pub background: [u8; 4],
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1920,
                height: 1080,
            },
            fps: Fps { num: 24, den: 1 },
            min_scale: 0.9,
            slide: SlidePolicy::OneCanvas,
            seed: 0,
            background: [0, 0, 0, 255],
        }
    }
}

impl ReelConfig {
    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ReelError::validation(format!("parse config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate field ranges.
    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 || self.min_scale >= 1.0 {
            return Err(ReelError::validation("min_scale must be in (0, 1)"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
