//! # Video Processing Module
//!
//! ## Responsibilities:
//! - Video compression with FFmpeg (libx264 + AAC)
//! - Quality control through CRF and the configured encoding preset
//! - Scale filter bounding height while deriving width (never upscaling)
//! - Progressive-download layout via `-movflags +faststart`
//! - Wall-clock timeout around the external process
//!
//! ## FFmpeg invocation:
//! ```text
//! ffmpeg -i <src> -c:v libx264 -crf <crf> -preset <preset>
//!        -vf scale=-2:min(<max_h>,ih):flags=lanczos
//!        -c:a aac -b:a <bitrate> -movflags +faststart -y <tmp>
//! ```
//! Output is staged in a temp file with the destination's extension so a
//! failed run never leaves a partial file at the destination.
//!
//! ## Failure policy:
//! Missing binary, non-zero exit (stderr tail kept to 500 characters) and
//! timeout are all treated uniformly: the original is copied verbatim to the
//! destination and a failed result with 0% reduction is recorded. Nothing
//! propagates past this boundary except a failure of the fallback copy.

use crate::config::Config;
use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::platform;
use crate::progress::ConversionResult;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, warn};

/// Characters of FFmpeg stderr kept on a failure record.
const STDERR_TAIL_CHARS: usize = 500;

/// Handles video optimization
pub struct VideoProcessor {
    config: Config,
    ffmpeg: String,
}

impl VideoProcessor {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ffmpeg: platform::ffmpeg_command().to_string(),
        }
    }

    /// Build a processor that invokes a specific transcoder binary. Used by
    /// tests to simulate a machine without FFmpeg installed.
    pub fn with_command(config: Config, ffmpeg: impl Into<String>) -> Self {
        Self {
            config,
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Transcode one video, falling back to a verbatim copy on any error.
    ///
    /// Always returns a `ConversionResult`; the only error that escapes is
    /// a filesystem failure of the fallback copy itself.
    pub async fn optimize(&self, input: &Path, dest: &Path) -> Result<ConversionResult> {
        let original_mb = FileManager::file_size_mb(input)
            .with_context(|| format!("failed to stat source file {}", input.display()))?;

        match self.transcode(input, dest).await {
            Ok(()) => {
                let optimized_mb = FileManager::file_size_mb(dest)
                    .with_context(|| format!("failed to stat output file {}", dest.display()))?;
                Ok(ConversionResult::optimized(input, dest, original_mb, optimized_mb))
            }
            Err(e) => {
                warn!("Video transcode failed for {}: {}", input.display(), e);
                FileManager::copy_verbatim(input, dest).with_context(|| {
                    format!("fallback copy failed for {}", input.display())
                })?;
                let copied_mb = FileManager::file_size_mb(dest)
                    .with_context(|| format!("failed to stat fallback copy {}", dest.display()))?;
                Ok(ConversionResult::fallback(
                    input,
                    dest,
                    original_mb,
                    copied_mb,
                    e.to_string(),
                ))
            }
        }
    }

    async fn transcode(&self, input: &Path, dest: &Path) -> Result<(), OptimizeError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Stage into a temp file carrying the destination's extension so
        // FFmpeg picks the right container and failures leave dest untouched.
        let suffix = dest
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_else(|| ".mp4".to_string());
        let temp_file = NamedTempFile::with_suffix(suffix)?;
        let temp_path = temp_file.path();

        // min(h, ih) keeps shorter videos at their native height
        let scale_filter = format!(
            "scale=-2:min({}\\,ih):flags=lanczos",
            self.config.video_max_height
        );

        debug!(
            "Compressing video: {} (CRF: {}, audio: {})",
            input.display(),
            self.config.video_crf,
            self.config.audio_bitrate
        );

        let input_arg = input.to_string_lossy();
        let output_arg = temp_path.to_string_lossy();
        let crf_arg = self.config.video_crf.to_string();

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args([
            "-i",
            input_arg.as_ref(),
            "-c:v",
            "libx264",
            "-crf",
            crf_arg.as_str(),
            "-preset",
            self.config.video_preset.as_str(),
            "-vf",
            scale_filter.as_str(),
            "-c:a",
            "aac",
            "-b:a",
            self.config.audio_bitrate.as_str(),
            "-movflags",
            "+faststart",
            "-loglevel",
            "error",
            "-y",
            output_arg.as_ref(),
        ]);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OptimizeError::ToolMissing);
            }
            Err(e) => return Err(e.into()),
        };

        let timeout = Duration::from_secs(self.config.video_timeout_secs);
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            // Dropping the wait future kills the child via kill_on_drop
            Err(_) => return Err(OptimizeError::ToolTimeout(self.config.video_timeout_secs)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OptimizeError::ToolFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: tail_chars(&stderr, STDERR_TAIL_CHARS),
            });
        }

        std::fs::copy(temp_path, dest)?;
        Ok(())
    }
}

/// Last `limit` characters of a string, on char boundaries.
fn tail_chars(s: &str, limit: usize) -> String {
    let count = s.chars().count();
    if count <= limit {
        s.to_string()
    } else {
        s.chars().skip(count - limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_tool_falls_back_to_copy() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("clip.mp4");
        std::fs::write(&input, b"fake video payload").unwrap();

        let processor =
            VideoProcessor::with_command(Config::media(), "definitely-not-a-real-transcoder");
        let dest = temp_dir.path().join("out/clip.mp4");
        let result = processor.optimize(&input, &dest).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.reduction_percent, 0.0);
        assert!(result.error.as_deref().unwrap().contains("not found"));
        // Destination holds the untouched original bytes
        assert_eq!(std::fs::read(&dest).unwrap(), b"fake video payload");
    }

    #[tokio::test]
    async fn test_nonzero_exit_falls_back_to_copy() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("clip.mkv");
        std::fs::write(&input, b"payload").unwrap();

        // `false` ignores its arguments and exits 1
        let processor = VideoProcessor::with_command(Config::media(), "false");
        let dest = temp_dir.path().join("out/clip.mkv");
        let result = processor.optimize(&input, &dest).await.unwrap();

        assert!(!result.success);
        assert!(result.error.is_some());
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_copy() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("clip.mp4");
        std::fs::write(&input, b"payload").unwrap();

        let config = Config {
            video_timeout_secs: 1,
            ..Config::media()
        };
        // A fake transcoder that ignores its arguments and sleeps past the
        // one-second budget, tripping the timeout path
        let slow = temp_dir.path().join("slow-transcoder.sh");
        std::fs::write(&slow, "#!/bin/sh\nsleep 30\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&slow, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let processor = VideoProcessor::with_command(config, slow.to_string_lossy());
        let dest = temp_dir.path().join("out/clip.mp4");
        let result = processor.optimize(&input, &dest).await.unwrap();

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("timed out"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn test_tail_chars() {
        assert_eq!(tail_chars("short", 500), "short");
        let long = "x".repeat(600);
        assert_eq!(tail_chars(&long, 500).len(), 500);
        // Multibyte input stays on char boundaries
        assert_eq!(tail_chars("áéíóú", 3), "íóú");
    }
}
