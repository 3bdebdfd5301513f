use std::path::{Path, PathBuf};

use tracing::warn;

use crate::assets::photos::probe_dimensions;
use crate::foundation::core::{Canvas, ScrollAxis};
use crate::foundation::error::{ReelError, ReelResult};

/// One timeline unit: a photograph strip or a synthetic endcap.
///
/// Entries carry layout metadata only. Pixel state lives in
/// [`crate::timeline::schedule::EntryCache`] and exists only while the entry
/// overlaps the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Photo path; `None` for endcaps.
    pub source: Option<PathBuf>,
    /// Native photo dimensions probed at build time; `None` for endcaps.
    pub native: Option<(u32, u32)>,
    /// Length along the scroll axis, in canvas pixels.
    pub footprint: u32,
    /// Offset of the leading edge on the scroll axis.
    pub position: u64,
}

impl Entry {
    /// Return `true` for the synthetic blank entries bracketing the photos.
    pub fn is_endcap(&self) -> bool {
        self.source.is_none()
    }
}

/// Immutable scroll-axis layout: ordered entries plus total length.
///
/// Invariant: entry footprints tile the scroll axis exactly --
/// `entries[i].position + entries[i].footprint == entries[i + 1].position`
/// and `total_length` is the sum of all footprints.
#[derive(Clone, Debug)]
pub struct Timeline {
    entries: Vec<Entry>,
    total_length: u64,
    canvas: Canvas,
}

impl Timeline {
    /// Ordered entries, endcaps included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Total scrollable length: the sum of all footprints.
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    /// The canvas this layout was built for.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }
}

/// Footprint of a photo with native size `(nw, nh)` on the given canvas:
/// the scroll-axis extent after scaling the photo's cross-axis dimension to
/// match the canvas's cross dimension exactly.
pub fn photo_footprint(nw: u32, nh: u32, canvas: Canvas) -> u32 {
    let cross = f64::from(canvas.cross_dim());
    match canvas.scroll_axis() {
        ScrollAxis::Horizontal => (f64::from(nw) * cross / f64::from(nh)).round() as u32,
        ScrollAxis::Vertical => (f64::from(nh) * cross / f64::from(nw)).round() as u32,
    }
}

/// Lay the given photos end-to-end on the scroll axis.
///
/// Each photo is scaled uniformly so its cross-axis dimension matches the
/// canvas's cross dimension; the scaled scroll-axis dimension, rounded,
/// becomes its footprint. A leading and trailing endcap of footprint
/// `max(width, height)` bracket the sequence. Photos whose dimensions cannot
/// be probed are skipped with a warning; an empty usable set is an error.
///
/// Purely deterministic: identical ordered input and canvas produce an
/// identical layout.
pub fn build_timeline(photos: &[impl AsRef<Path>], canvas: Canvas) -> ReelResult<Timeline> {
    build_timeline_with(photos, canvas, probe_dimensions)
}

/// [`build_timeline`] with an injectable dimension probe.
pub fn build_timeline_with(
    photos: &[impl AsRef<Path>],
    canvas: Canvas,
    mut probe: impl FnMut(&Path) -> ReelResult<(u32, u32)>,
) -> ReelResult<Timeline> {
    let major = u64::from(canvas.major_dim());

    let mut entries = Vec::with_capacity(photos.len() + 2);
    let mut position = 0u64;

    entries.push(Entry {
        source: None,
        native: None,
        footprint: canvas.major_dim(),
        position,
    });
    position += major;

    let mut usable = 0usize;
    for photo in photos {
        let path = photo.as_ref();
        let (nw, nh) = match probe(path) {
            Ok(dims) => dims,
            Err(e) => {
                warn!(photo = %path.display(), error = %e, "skipping unreadable photo");
                continue;
            }
        };

        let footprint = photo_footprint(nw, nh, canvas);
        if footprint == 0 {
            warn!(photo = %path.display(), "skipping photo with zero scaled footprint");
            continue;
        }

        entries.push(Entry {
            source: Some(path.to_path_buf()),
            native: Some((nw, nh)),
            footprint,
            position,
        });
        position += u64::from(footprint);
        usable += 1;
    }

    if usable == 0 {
        return Err(ReelError::validation(
            "no usable photos: cannot build a non-trivial timeline",
        ));
    }

    entries.push(Entry {
        source: None,
        native: None,
        footprint: canvas.major_dim(),
        position,
    });
    position += major;

    Ok(Timeline {
        entries,
        total_length: position,
        canvas,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/layout.rs"]
mod tests;
