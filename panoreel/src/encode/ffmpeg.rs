use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

/// Options for [`encode_video`].
#[derive(Clone, Debug)]
pub struct EncodeVideoOpts {
    /// `%08d.png` input pattern, typically from
    /// [`crate::encode::sink::PngSequenceSink::frame_pattern`].
    pub frame_pattern: PathBuf,
    /// Input/output frame rate.
    pub fps: Fps,
    /// Optional soundtrack muxed alongside the video (`aac`, `-shortest`).
    pub audio: Option<PathBuf>,
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl EncodeVideoOpts {
    /// Create options for encoding `frame_pattern` into `out_path`.
    pub fn new(frame_pattern: impl Into<PathBuf>, fps: Fps, out_path: impl Into<PathBuf>) -> Self {
        Self {
            frame_pattern: frame_pattern.into(),
            fps,
            audio: None,
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Encode a rendered PNG sequence (plus optional soundtrack) into an MP4
/// through the system `ffmpeg`.
///
/// Invoked once after all frames are written. Output is `libx264` with
/// `yuv420p` for broad compatibility.
pub fn encode_video(opts: &EncodeVideoOpts) -> ReelResult<()> {
    if opts.fps.num == 0 || opts.fps.den == 0 {
        return Err(ReelError::validation("fps must be non-zero"));
    }
    ensure_parent_dir(&opts.out_path)?;
    if !opts.overwrite && opts.out_path.exists() {
        return Err(ReelError::validation(format!(
            "output file '{}' already exists",
            opts.out_path.display()
        )));
    }
    if !is_ffmpeg_on_path() {
        return Err(ReelError::render(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    let mut cmd = Command::new("ffmpeg");
    cmd.arg(if opts.overwrite { "-y" } else { "-n" });
    cmd.args([
        "-loglevel",
        "error",
        "-framerate",
        &format!("{}/{}", opts.fps.num, opts.fps.den),
        "-i",
    ])
    .arg(&opts.frame_pattern);

    if let Some(audio) = opts.audio.as_ref() {
        cmd.arg("-i").arg(audio).args(["-c:a", "aac", "-shortest"]);
    } else {
        cmd.arg("-an");
    }

    cmd.args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"])
        .arg(&opts.out_path);

    let out = cmd.output().map_err(|e| {
        ReelError::render(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(ReelError::render(format!(
            "ffmpeg exited with status {}: {}",
            out.status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

// No unit tests here: encoding shells out to `ffmpeg` and is validated by
// the CLI integration test when the tool is available.
