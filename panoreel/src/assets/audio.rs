use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};

/// Probe an audio file's duration in seconds through `ffprobe`.
///
/// A missing, unparseable, or non-positive duration is an error: the frame
/// count is derived from it, so rendering must not start without one.
pub fn probe_duration(path: &Path) -> ReelResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .map_err(|e| ReelError::probe(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::probe(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::probe(format!("ffprobe json parse failed: {e}")))?;
    let duration = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| {
            ReelError::probe(format!(
                "ffprobe reported no duration for '{}'",
                path.display()
            ))
        })?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(ReelError::probe(format!(
            "audio '{}' has non-positive duration",
            path.display()
        )));
    }
    Ok(duration)
}

/// Concatenate audio tracks into a single file through `ffmpeg`.
///
/// Used when several music files back one slideshow; the combined file is
/// then probed and muxed as a single input.
pub fn concat_audio(inputs: &[impl AsRef<Path>], out_path: &Path) -> ReelResult<()> {
    if inputs.is_empty() {
        return Err(ReelError::validation("concat_audio requires at least one input"));
    }

    let mut spec = String::from("concat:");
    for (i, input) in inputs.iter().enumerate() {
        if i > 0 {
            spec.push('|');
        }
        spec.push_str(&input.as_ref().to_string_lossy());
    }

    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-i", &spec])
        .arg(out_path)
        .output()
        .map_err(|e| ReelError::probe(format!("failed to run ffmpeg for concat: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::probe(format!(
            "ffmpeg concat failed for '{}': {}",
            out_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(())
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    std::process::Command::new("ffprobe")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

// No unit tests here: these functions shell out to `ffprobe`/`ffmpeg` and are
// validated by integration tests that are skipped when the tools are missing.
