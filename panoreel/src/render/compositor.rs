use image::imageops::FilterType;

use crate::assets::photos::PhotoPixels;
use crate::foundation::core::{Canvas, ScrollAxis};
use crate::foundation::error::{ReelError, ReelResult};
use crate::motion::pan::CropRect;
use crate::render::RasterFrame;

/// Clipped overlap between a strip at `onscreen` and the canvas range
/// `[0, major_dim)`, with half-open semantics on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripOverlap {
    /// First covered canvas coordinate on the scroll axis.
    pub canvas_start: i64,
    /// First strip-local coordinate to copy from.
    pub strip_start: i64,
    /// Number of covered scroll-axis pixels.
    pub len: i64,
}

/// Compute the clipped overlap, or `None` when the strip misses the canvas.
pub fn strip_overlap(onscreen: i64, footprint: u32, major_dim: u32) -> Option<StripOverlap> {
    let canvas_start = onscreen.max(0);
    let canvas_end = (onscreen + i64::from(footprint)).min(i64::from(major_dim));
    let len = canvas_end - canvas_start;
    if len <= 0 {
        return None;
    }
    Some(StripOverlap {
        canvas_start,
        strip_start: canvas_start - onscreen,
        len,
    })
}

/// Crop `photo` to `rect` and resize the crop to a `footprint x cross_dim`
/// strip oriented along the canvas's scroll axis.
pub fn crop_resize_strip(
    photo: &PhotoPixels,
    rect: CropRect,
    footprint: u32,
    canvas: Canvas,
) -> ReelResult<RasterFrame> {
    if !rect.contained_in(photo.width, photo.height) {
        return Err(ReelError::render(format!(
            "crop rect {rect:?} exceeds native bounds {}x{}",
            photo.width, photo.height
        )));
    }

    let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
        photo.width,
        photo.height,
        photo.rgba8.as_slice(),
    )
    .ok_or_else(|| ReelError::render("photo buffer size mismatch with dimensions"))?;

    // Round the float rect onto the pixel grid, clamped back into bounds.
    let x = (rect.x.round() as u32).min(photo.width.saturating_sub(1));
    let y = (rect.y.round() as u32).min(photo.height.saturating_sub(1));
    let w = (rect.width.round() as u32).clamp(1, photo.width - x);
    let h = (rect.height.round() as u32).clamp(1, photo.height - y);

    let (strip_w, strip_h) = match canvas.scroll_axis() {
        ScrollAxis::Horizontal => (footprint, canvas.cross_dim()),
        ScrollAxis::Vertical => (canvas.cross_dim(), footprint),
    };

    let cropped = image::imageops::crop_imm(&src, x, y, w, h);
    let resized = image::imageops::resize(&*cropped, strip_w, strip_h, FilterType::Triangle);

    Ok(RasterFrame {
        width: strip_w,
        height: strip_h,
        data: resized.into_raw(),
    })
}

/// Copy the visible band of `strip` into `frame` at `onscreen`.
///
/// Half-open intervals on both ends keep adjacent entries gap-free and
/// overlap-free at their shared boundaries.
pub fn blit_strip(
    frame: &mut RasterFrame,
    strip: &RasterFrame,
    onscreen: i64,
    canvas: Canvas,
) -> ReelResult<()> {
    let axis = canvas.scroll_axis();
    let footprint = match axis {
        ScrollAxis::Horizontal => strip.width,
        ScrollAxis::Vertical => strip.height,
    };
    let Some(overlap) = strip_overlap(onscreen, footprint, canvas.major_dim()) else {
        return Ok(());
    };

    if frame.width != canvas.width || frame.height != canvas.height {
        return Err(ReelError::render("frame size mismatch with canvas"));
    }
    let cross = canvas.cross_dim();
    match axis {
        ScrollAxis::Horizontal => {
            if strip.height != cross {
                return Err(ReelError::render("strip cross dimension mismatch"));
            }
            let len = overlap.len as usize * 4;
            for row in 0..cross as usize {
                let src_off = (row * strip.width as usize + overlap.strip_start as usize) * 4;
                let dst_off = (row * frame.width as usize + overlap.canvas_start as usize) * 4;
                frame.data[dst_off..dst_off + len]
                    .copy_from_slice(&strip.data[src_off..src_off + len]);
            }
        }
        ScrollAxis::Vertical => {
            if strip.width != cross {
                return Err(ReelError::render("strip cross dimension mismatch"));
            }
            // Rows are contiguous on the vertical scroll axis.
            let row_bytes = cross as usize * 4;
            let src_off = overlap.strip_start as usize * row_bytes;
            let dst_off = overlap.canvas_start as usize * row_bytes;
            let len = overlap.len as usize * row_bytes;
            frame.data[dst_off..dst_off + len].copy_from_slice(&strip.data[src_off..src_off + len]);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
