use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Photo file extensions accepted by [`list_photos`] by default.
pub const DEFAULT_PHOTO_EXTS: &[&str] = &["jpg", "jpeg", "png"];

/// Decoded photo in straight RGBA8 form.
#[derive(Clone, Debug)]
pub struct PhotoPixels {
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major straight RGBA8.
    pub rgba8: Arc<Vec<u8>>,
}

/// List photo files in `dir` with one of the given extensions, sorted by
/// file name.
///
/// Extension matching is case-insensitive. Subdirectories are not entered.
pub fn list_photos(dir: &Path, exts: &[&str]) -> ReelResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read photo directory '{}'", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if exts.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Read a photo's native dimensions from its header without decoding pixels.
pub fn probe_dimensions(path: &Path) -> ReelResult<(u32, u32)> {
    let (w, h) = image::image_dimensions(path)
        .map_err(|e| ReelError::asset(format!("probe '{}': {e}", path.display())))?;
    if w == 0 || h == 0 {
        return Err(ReelError::asset(format!(
            "photo '{}' has zero dimensions",
            path.display()
        )));
    }
    Ok((w, h))
}

/// Decode a photo into straight RGBA8 pixels.
pub fn decode_photo(path: &Path) -> ReelResult<PhotoPixels> {
    let dyn_img = image::open(path)
        .map_err(|e| ReelError::asset(format!("decode '{}': {e}", path.display())))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(PhotoPixels {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/photos.rs"]
mod tests;
