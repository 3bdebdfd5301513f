use std::sync::Arc;

use tracing::debug;

use crate::assets::photos::PhotoPixels;
use crate::config::SlidePolicy;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ReelResult;
use crate::motion::pan::PanCrop;
use crate::timeline::layout::{Entry, Timeline};

/// Total slide distance for a layout under the given policy.
pub fn slide_distance(total_length: u64, major_dim: u32, policy: SlidePolicy) -> u64 {
    match policy {
        SlidePolicy::OneCanvas => total_length.saturating_sub(u64::from(major_dim)),
        SlidePolicy::TwoCanvas => total_length.saturating_sub(2 * u64::from(major_dim)),
    }
}

/// Scroll offset for a frame: `round(i * slide / (total_frames - 1))`.
///
/// Monotonically non-decreasing in `i`, with `offset(0) == 0` and
/// `offset(total_frames - 1) == slide`. Renders shorter than two frames
/// never move.
pub fn slide_offset(frame: FrameIndex, total_frames: u64, slide: u64) -> u64 {
    if total_frames < 2 {
        return 0;
    }
    let i = frame.0.min(total_frames - 1) as u128;
    let den = (total_frames - 1) as u128;
    ((i * slide as u128 + den / 2) / den) as u64
}

/// Screen-space position of an entry's leading edge at the given offset.
pub fn onscreen_position(entry: &Entry, offset: u64) -> i64 {
    entry.position as i64 - offset as i64
}

/// Nonzero overlap between `[onscreen, onscreen + footprint)` and the
/// canvas range `[0, major_dim)`.
pub fn is_visible(onscreen: i64, footprint: u32, major_dim: u32) -> bool {
    onscreen < i64::from(major_dim) && onscreen + i64::from(footprint) > 0
}

/// Pan progress for a visible entry: 0 when the leading edge sits at the
/// canvas's far edge, 1 when the trailing edge reaches the near edge.
pub fn pan_alpha(onscreen: i64, footprint: u32, major_dim: u32) -> f64 {
    let travelled = f64::from(major_dim) - onscreen as f64;
    let span = f64::from(major_dim) + f64::from(footprint);
    (travelled / span).clamp(0.0, 1.0)
}

/// Pixel and pan state for one timeline entry.
///
/// The tagged representation replaces the historical "empty buffer means
/// unloaded" sentinel: pixels and crop rectangles exist exactly while the
/// entry is `Loaded`.
#[derive(Clone, Debug, Default)]
pub enum EntryState {
    /// No pixel state resident.
    #[default]
    Unloaded,
    /// Decoded pixels plus the start/end crop pair.
    Loaded {
        /// Decoded native-resolution pixels.
        pixels: Arc<PhotoPixels>,
        /// Pan rectangles derived at load time.
        pan: PanCrop,
    },
    /// Decode failed after layout; the entry stays blank for the rest of
    /// the run instead of retrying every frame.
    Skipped,
}

impl EntryState {
    /// Return `true` when pixel state is resident.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Per-entry state store driven by the visibility schedule.
#[derive(Debug, Default)]
pub struct EntryCache {
    states: Vec<EntryState>,
}

impl EntryCache {
    /// Create a cache with one `Unloaded` slot per timeline entry.
    pub fn new(entry_count: usize) -> Self {
        let mut states = Vec::with_capacity(entry_count);
        states.resize_with(entry_count, EntryState::default);
        Self { states }
    }

    /// Current state of the entry at `index`.
    pub fn state(&self, index: usize) -> &EntryState {
        &self.states[index]
    }

    /// Number of entries currently `Loaded`.
    pub fn loaded_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_loaded()).count()
    }

    /// Apply load/evict transitions for one frame at the given offset.
    ///
    /// `load` is invoked exactly once per `Unloaded -> Loaded` transition;
    /// it returns `Ok(None)` to recover locally from a failed decode (the
    /// entry becomes `Skipped` and is never retried). Entries that remain
    /// visible keep their state untouched, so re-running the same offset is
    /// a no-op.
    pub fn sync(
        &mut self,
        timeline: &Timeline,
        offset: u64,
        mut load: impl FnMut(usize, &Entry) -> ReelResult<Option<(Arc<PhotoPixels>, PanCrop)>>,
    ) -> ReelResult<()> {
        let major_dim = timeline.canvas().major_dim();
        for (index, entry) in timeline.entries().iter().enumerate() {
            if entry.is_endcap() {
                continue;
            }
            let onscreen = onscreen_position(entry, offset);
            let visible = is_visible(onscreen, entry.footprint, major_dim);

            let state = &mut self.states[index];
            match state {
                EntryState::Unloaded if visible => {
                    *state = match load(index, entry)? {
                        Some((pixels, pan)) => {
                            debug!(index, onscreen, "entry loaded");
                            EntryState::Loaded { pixels, pan }
                        }
                        None => EntryState::Skipped,
                    };
                }
                EntryState::Loaded { .. } if !visible => {
                    debug!(index, onscreen, "entry evicted");
                    *state = EntryState::Unloaded;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/schedule.rs"]
mod tests;
