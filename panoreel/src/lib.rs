//! Panoreel renders a photo set into a continuously scrolling slideshow
//! video timed to a soundtrack.
//!
//! Photographs are laid end-to-end on a virtual scroll axis (the canvas's
//! longer dimension), each receiving a seeded pan/zoom crop over its visible
//! lifetime. Per frame, the renderer computes which photos overlap the
//! canvas, lazily decoding and evicting pixel state, and composites clipped,
//! resized strips with exact half-open boundary arithmetic.
//!
//! The public API is session-oriented:
//!
//! - Build a [`ReelConfig`] and a photo list
//! - Create a [`RenderSession`] with a frame count derived from the
//!   soundtrack duration
//! - Render single frames or stream a range into a [`FrameSink`], then
//!   encode with [`encode_video`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// External asset collaborators (photo decode, audio probing).
pub mod assets;
/// Run configuration.
pub mod config;
/// Frame sinks and final video encoding.
pub mod encode;
/// Pan/zoom crop motion.
pub mod motion;
/// Frame compositing and the render driver.
pub mod render;
/// Scroll-axis layout and visibility scheduling.
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, ScrollAxis};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::config::{ReelConfig, SlidePolicy};
pub use crate::encode::ffmpeg::{EncodeVideoOpts, encode_video};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::motion::pan::{CropRect, PanCrop, PanSampler};
pub use crate::render::RasterFrame;
pub use crate::render::session::{RenderSession, RenderSessionOpts, RenderStats};
pub use crate::timeline::layout::{Entry, Timeline, build_timeline};
