use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, mpsc};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::assets::photos::{PhotoPixels, decode_photo};
use crate::config::ReelConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::motion::pan::{PanCrop, PanSampler};
use crate::render::RasterFrame;
use crate::render::compositor::{blit_strip, crop_resize_strip};
use crate::timeline::layout::{Entry, Timeline, build_timeline};
use crate::timeline::schedule::{
    EntryCache, EntryState, is_visible, onscreen_position, pan_alpha, slide_distance, slide_offset,
};

/// Options controlling [`RenderSession::render_range`] behavior.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Enable frame-level parallelism (rayon), using a dedicated thread
    /// pool. Output is byte-identical to the sequential path.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon
    /// defaults.
    pub threads: Option<usize>,
    /// Chunk size for the parallel render->encode pipeline; bounds the
    /// reorder buffer at the sink boundary.
    pub chunk_size: usize,
    /// Bounded channel capacity between render workers and the encoder
    /// thread.
    pub channel_capacity: usize,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
            channel_capacity: 4,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames pushed to the sink.
    pub frames_total: u64,
}

/// Sliding-mosaic renderer over a built timeline.
///
/// A session front-loads layout and slide-distance computation, then
/// provides per-frame execution: single frames via
/// [`RenderSession::render_frame`], full ranges streamed into a
/// [`FrameSink`] via [`RenderSession::render_range`].
pub struct RenderSession {
    config: ReelConfig,
    timeline: Timeline,
    total_frames: u64,
    slide: u64,
    sampler: PanSampler,
    cache: EntryCache,
}

impl RenderSession {
    /// Build a session for the given photos and frame count.
    ///
    /// `total_frames` is typically derived from the soundtrack:
    /// `fps.secs_to_frames_round(probe_duration(audio)?)`.
    pub fn new(
        config: &ReelConfig,
        photos: &[impl AsRef<Path>],
        total_frames: u64,
    ) -> ReelResult<Self> {
        config.validate()?;
        if total_frames == 0 {
            return Err(ReelError::validation("total_frames must be >= 1"));
        }

        let timeline = build_timeline(photos, config.canvas)?;
        let slide = slide_distance(
            timeline.total_length(),
            config.canvas.major_dim(),
            config.slide,
        );
        let sampler = PanSampler::new(config.seed, config.min_scale, config.canvas.aspect())?;
        let cache = EntryCache::new(timeline.entries().len());

        info!(
            entries = timeline.entries().len(),
            total_length = timeline.total_length(),
            slide,
            total_frames,
            "timeline built"
        );

        Ok(Self {
            config: *config,
            timeline,
            total_frames,
            slide,
            sampler,
            cache,
        })
    }

    /// The built scroll-axis layout.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Number of frames this session renders.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Render a single frame.
    ///
    /// Frames may be requested in any order; the lazy load/evict cache
    /// follows the requested offsets.
    #[tracing::instrument(skip(self))]
    pub fn render_frame(&mut self, frame: FrameIndex) -> ReelResult<RasterFrame> {
        if frame.0 >= self.total_frames {
            return Err(ReelError::validation(
                "render_frame frame must be within the session's frame count",
            ));
        }
        let offset = slide_offset(frame, self.total_frames, self.slide);
        sync_and_compose(
            &self.timeline,
            &mut self.cache,
            &self.sampler,
            &self.config,
            offset,
        )
    }

    /// Render a frame range and stream frames into a sink.
    ///
    /// The sink receives frames in strictly increasing frame index order.
    /// When `parallel` is enabled, out-of-order worker completion is
    /// reordered at the sink boundary through a bounded channel; each
    /// worker owns its own decode cache, which is sound because pan
    /// rectangles are a pure function of the seed and entry index.
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
        opts: &RenderSessionOpts,
    ) -> ReelResult<RenderStats> {
        if range.is_empty() {
            return Err(ReelError::validation("render_range range must be non-empty"));
        }
        if range.end.0 > self.total_frames {
            return Err(ReelError::validation(
                "render_range range must be within the session's frame count",
            ));
        }

        let cfg = SinkConfig {
            width: self.config.canvas.width,
            height: self.config.canvas.height,
            fps: self.config.fps,
        };

        if !opts.parallel {
            sink.begin(cfg)?;
            for f in range.start.0..range.end.0 {
                let frame = self.render_frame(FrameIndex(f))?;
                sink.push_frame(FrameIndex(f), &frame)?;
            }
            sink.end()?;
            return Ok(RenderStats {
                frames_total: range.len_frames(),
            });
        }

        let pool = build_thread_pool(opts.threads)?;
        let cap = opts.channel_capacity.max(1);
        let chunk_size = (opts.chunk_size.max(1) as u64).min(range.len_frames());
        let range_start = range.start.0;
        let range_end = range.end.0;

        let timeline = &self.timeline;
        let sampler = &self.sampler;
        let config = &self.config;
        let total_frames = self.total_frames;
        let slide = self.slide;
        let entry_count = timeline.entries().len();

        // Encoder thread: enforce in-order delivery to the sink regardless
        // of render completion order.
        std::thread::scope(|scope| -> ReelResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            let sink_ref: &mut dyn FrameSink = sink;

            let enc = scope.spawn(move || -> ReelResult<()> {
                sink_ref.begin(cfg)?;

                let mut next = range_start;
                let mut pending = HashMap::<u64, Arc<RasterFrame>>::new();
                while next < range_end {
                    if let Some(frame) = pending.remove(&next) {
                        sink_ref.push_frame(FrameIndex(next), &frame)?;
                        next += 1;
                        continue;
                    }

                    let msg = rx.recv().map_err(|_| {
                        ReelError::render("encoder channel disconnected unexpectedly")
                    })?;
                    pending.insert(msg.idx.0, msg.frame);
                }

                sink_ref.end()?;
                Ok(())
            });

            // Chunked fan-out keeps the encoder's reorder buffer bounded.
            let produce_res = (|| -> ReelResult<()> {
                let mut chunk_start = range_start;
                while chunk_start < range_end {
                    let chunk_end = (chunk_start + chunk_size).min(range_end);
                    pool.install(|| {
                        (chunk_start..chunk_end).into_par_iter().try_for_each_init(
                            || EntryCache::new(entry_count),
                            |cache, f| -> ReelResult<()> {
                                let offset = slide_offset(FrameIndex(f), total_frames, slide);
                                let frame =
                                    sync_and_compose(timeline, cache, sampler, config, offset)?;
                                tx.send(FrameMsg {
                                    idx: FrameIndex(f),
                                    frame: Arc::new(frame),
                                })
                                .map_err(|_| {
                                    ReelError::render("encoder thread is not accepting frames")
                                })
                            },
                        )
                    })?;
                    chunk_start = chunk_end;
                }
                Ok(())
            })();

            drop(tx);
            let enc_res = enc
                .join()
                .map_err(|_| ReelError::render("encoder thread panicked"))?;

            produce_res?;
            enc_res?;
            Ok(RenderStats {
                frames_total: range_end - range_start,
            })
        })
    }
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: Arc<RasterFrame>,
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "render_range 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

/// Apply load/evict transitions for `offset`, then composite the frame.
fn sync_and_compose(
    timeline: &Timeline,
    cache: &mut EntryCache,
    sampler: &PanSampler,
    config: &ReelConfig,
    offset: u64,
) -> ReelResult<RasterFrame> {
    cache.sync(timeline, offset, |index, entry| {
        load_entry(sampler, index, entry)
    })?;
    compose(timeline, cache, config, offset)
}

/// Decode a photo and derive its pan rectangles.
///
/// Decode and sampling failures are recovered locally: the entry is
/// reported unloadable (`None`) and the render continues without it.
fn load_entry(
    sampler: &PanSampler,
    index: usize,
    entry: &Entry,
) -> ReelResult<Option<(Arc<PhotoPixels>, PanCrop)>> {
    let Some(path) = entry.source.as_ref() else {
        return Ok(None);
    };
    let loaded = decode_photo(path).and_then(|pixels| {
        let pan = sampler.sample(index as u64, pixels.width, pixels.height)?;
        Ok((Arc::new(pixels), pan))
    });
    match loaded {
        Ok(state) => Ok(Some(state)),
        Err(e) => {
            warn!(photo = %path.display(), error = %e, "excluding photo from render");
            Ok(None)
        }
    }
}

/// Composite all visible entries for one frame.
///
/// The canvas starts as the configured background (which is what endcaps
/// and skipped entries show); visible photo strips are then blitted in
/// timeline order. Footprints are disjoint by construction, so no column
/// is written twice.
fn compose(
    timeline: &Timeline,
    cache: &EntryCache,
    config: &ReelConfig,
    offset: u64,
) -> ReelResult<RasterFrame> {
    let canvas = config.canvas;
    let major_dim = canvas.major_dim();
    let mut frame = RasterFrame::filled(canvas, config.background);

    for (index, entry) in timeline.entries().iter().enumerate() {
        if entry.is_endcap() {
            continue;
        }
        let onscreen = onscreen_position(entry, offset);
        if !is_visible(onscreen, entry.footprint, major_dim) {
            continue;
        }
        let EntryState::Loaded { pixels, pan } = cache.state(index) else {
            continue;
        };
        let rect = pan.at(pan_alpha(onscreen, entry.footprint, major_dim));
        let strip = crop_resize_strip(pixels, rect, entry.footprint, canvas)?;
        blit_strip(&mut frame, &strip, onscreen, canvas)?;
    }

    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
