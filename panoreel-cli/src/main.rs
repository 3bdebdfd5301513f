use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use panoreel::assets::{audio, photos};
use panoreel::{
    EncodeVideoOpts, FrameIndex, FrameRange, PngSequenceSink, ReelConfig, RenderSession,
    RenderSessionOpts, SlidePolicy, encode_video,
};

#[derive(Parser, Debug)]
#[command(name = "panoreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the full slideshow MP4 (requires `ffmpeg`/`ffprobe` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Directory of photos (jpg/jpeg/png), slideshow order is file-name order.
    #[arg(long)]
    photos: PathBuf,

    /// Base configuration JSON; flags below override individual fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Output frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Minimum pan-crop scale fraction in (0, 1).
    #[arg(long)]
    min_scale: Option<f64>,

    /// Slide-distance policy.
    #[arg(long, value_enum)]
    slide: Option<SlideArg>,

    /// Pan-crop RNG seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum SlideArg {
    OneCanvas,
    TwoCanvas,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Total frame count the slideshow is timed to.
    #[arg(long)]
    frames: u64,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Soundtrack file(s); several are concatenated in the given order.
    #[arg(long, required = true, num_args = 1..)]
    audio: Vec<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Directory for the intermediate PNG sequence.
    #[arg(long, default_value = "frames")]
    frames_dir: PathBuf,

    /// Keep the PNG sequence after encoding.
    #[arg(long, default_value_t = false)]
    keep_frames: bool,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn build_config(common: &CommonArgs) -> anyhow::Result<ReelConfig> {
    let mut config = match common.config.as_ref() {
        Some(path) => ReelConfig::from_path(path)?,
        None => ReelConfig::default(),
    };
    if let Some(w) = common.width {
        config.canvas.width = w;
    }
    if let Some(h) = common.height {
        config.canvas.height = h;
    }
    if let Some(fps) = common.fps {
        config.fps = panoreel::Fps { num: fps, den: 1 };
    }
    if let Some(min_scale) = common.min_scale {
        config.min_scale = min_scale;
    }
    if let Some(slide) = common.slide {
        config.slide = match slide {
            SlideArg::OneCanvas => SlidePolicy::OneCanvas,
            SlideArg::TwoCanvas => SlidePolicy::TwoCanvas,
        };
    }
    if let Some(seed) = common.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn listed_photos(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let listed = photos::list_photos(dir, photos::DEFAULT_PHOTO_EXTS)?;
    if listed.is_empty() {
        anyhow::bail!("no photos found in '{}'", dir.display());
    }
    Ok(listed)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = build_config(&args.common)?;
    let listed = listed_photos(&args.common.photos)?;

    let mut sess = RenderSession::new(&config, &listed, args.frames)?;
    let frame = sess.render_frame(FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = build_config(&args.common)?;
    let listed = listed_photos(&args.common.photos)?;

    if !audio::is_ffprobe_on_path() {
        anyhow::bail!("ffprobe is required to derive the frame count, but was not found on PATH");
    }

    // Resolve the soundtrack first: its duration gates everything else.
    let mut concat_tmp = TempFileGuard(None);
    let audio_path = if args.audio.len() == 1 {
        args.audio[0].clone()
    } else {
        let tmp = std::env::temp_dir().join(format!("panoreel_audio_{}.wav", std::process::id()));
        audio::concat_audio(&args.audio, &tmp)?;
        concat_tmp.0 = Some(tmp.clone());
        tmp
    };
    let duration = audio::probe_duration(&audio_path)?;
    let total_frames = config.fps.secs_to_frames_round(duration);
    if total_frames == 0 {
        anyhow::bail!("soundtrack too short: derived frame count is zero");
    }

    let mut sess = RenderSession::new(&config, &listed, total_frames)?;
    let mut sink = PngSequenceSink::new(&args.frames_dir);
    let pattern = sink.frame_pattern();

    let range = FrameRange::new(FrameIndex(0), FrameIndex(total_frames))?;
    let opts = RenderSessionOpts {
        parallel: args.parallel,
        threads: args.threads,
        ..RenderSessionOpts::default()
    };
    let stats = sess.render_range(range, &mut sink, &opts)?;
    eprintln!("rendered {} frames", stats.frames_total);

    let enc = EncodeVideoOpts {
        frame_pattern: pattern,
        fps: config.fps,
        audio: Some(audio_path),
        out_path: args.out.clone(),
        overwrite: true,
    };
    encode_video(&enc)?;

    if !args.keep_frames {
        std::fs::remove_dir_all(&args.frames_dir).with_context(|| {
            format!("remove frames directory '{}'", args.frames_dir.display())
        })?;
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
