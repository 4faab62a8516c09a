//! # Main Optimizer Orchestrator Module
//!
//! ## Responsibilities:
//! - Coordinates enumeration, classification, transcoding and reporting
//! - Fails fast (before any processing) when the source root is missing
//! - Mirrors the source directory structure under the output root
//! - Folds every per-file result into the run summary, in enumeration order
//!
//! ## Flow per run:
//! 1. Validate configuration, check the source root exists
//! 2. Warn once if videos are enabled but FFmpeg is absent
//! 3. Enumerate every regular file under the source root
//! 4. Route each file: image transcode, video transcode, or verbatim copy
//! 5. Fold results into category statistics, emit a progress line per file
//! 6. Log the final per-category and grand-total report
//!
//! ## Error handling:
//! - Per-file transcode failures never abort the batch; the processors
//!   return a failed result backed by a verbatim copy
//! - Verbatim-copy failures on the pass-through route are logged and
//!   counted, and the loop continues
//! - The batch aborts only when the source root is missing or a transcode
//!   fallback copy itself fails
//!
//! Processing is fully sequential: one file at a time, the only await
//! points being the waits on external FFmpeg processes.

use crate::{
    config::Config,
    file_manager::{FileManager, MediaKind},
    image_processor::ImageProcessor,
    platform,
    progress::{Category, ConversionResult, ProgressManager, RunSummary},
    video_processor::VideoProcessor,
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Sequential batch optimizer for one source tree.
pub struct MediaOptimizer {
    config: Config,
    source_dir: PathBuf,
    output_dir: PathBuf,
    image_processor: ImageProcessor,
    video_processor: VideoProcessor,
}

impl MediaOptimizer {
    /// Create a new optimizer for a source/output directory pair.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            image_processor: ImageProcessor::new(config.clone()),
            video_processor: VideoProcessor::new(config.clone()),
            config,
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        })
    }

    /// Run the optimization process over the whole source tree.
    pub async fn run(&self) -> Result<RunSummary> {
        if !self.source_dir.exists() {
            return Err(anyhow::anyhow!(
                "Source directory does not exist: {}",
                self.source_dir.display()
            ));
        }

        self.log_configuration();

        if self.config.include_videos && !platform::is_ffmpeg_available().await {
            warn!("FFmpeg not found; videos will be copied unconverted");
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let files = FileManager::find_files(&self.source_dir)?;
        info!("Found {} files to process", files.len());

        let progress = ProgressManager::new(files.len() as u64);
        let mut summary = RunSummary::new();

        for file_path in &files {
            let relative = file_path
                .strip_prefix(&self.source_dir)
                .unwrap_or(file_path.as_path());
            let dest = self.output_dir.join(relative);

            match FileManager::classify(file_path, self.config.include_videos) {
                MediaKind::Image => {
                    let result = self.image_processor.optimize(file_path, &dest)?;
                    progress.update(&format_result_line(relative, &result));
                    summary.record(Category::Images, &result);
                }
                MediaKind::Video => {
                    let result = self.video_processor.optimize(file_path, &dest).await?;
                    progress.update(&format_result_line(relative, &result));
                    summary.record(Category::Videos, &result);
                }
                MediaKind::Other => {
                    match FileManager::copy_verbatim(file_path, &dest) {
                        Ok(_) => {
                            progress.update(&format!("⏭️  {}: copied", relative.display()));
                            summary.note_copied();
                        }
                        Err(e) => {
                            warn!("Failed to copy {}: {}", file_path.display(), e);
                            progress.update(&format!("⚠️  {}: copy failed", relative.display()));
                            summary.note_copy_error();
                        }
                    }
                }
            }
        }

        progress.finish(&summary.format_summary());
        summary.log_report();
        info!("Optimized files saved to: {}", self.output_dir.display());

        Ok(summary)
    }

    fn log_configuration(&self) {
        info!(
            "Source: {} → Output: {}",
            self.source_dir.display(),
            self.output_dir.display()
        );
        info!(
            "🖼️  Images: {} quality {} | max {}x{}",
            if self.config.convert_to_webp { "WebP" } else { "original format" },
            self.config.image_quality,
            self.config.image_max_width,
            self.config.image_max_height
        );
        if self.config.include_videos {
            info!(
                "🎬 Videos: CRF {} | max {}p | audio {}",
                self.config.video_crf, self.config.video_max_height, self.config.audio_bitrate
            );
        }
    }
}

fn format_result_line(relative: &Path, result: &ConversionResult) -> String {
    if result.success {
        format!(
            "✅ {}: {:.2} MB → {:.2} MB ({:.1}% saved)",
            relative.display(),
            result.original_size_mb,
            result.optimized_size_mb,
            result.reduction_percent
        )
    } else {
        format!(
            "⚠️  {}: {}",
            relative.display(),
            result.error.as_deref().unwrap_or("unknown error")
        )
    }
}
