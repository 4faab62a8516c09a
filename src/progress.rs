//! # Progress Tracking and Statistics Module
//!
//! ## Responsibilities:
//! - Progress bar with `indicatif` for per-file feedback
//! - `ConversionResult`: the immutable record each transcode produces
//! - `CategoryStats`: running totals per classification category
//! - `RunSummary`: the sequential fold of every result, plus the final report
//!
//! ## Statistics tracked per category:
//! - **processed**: files routed through the category's transcoder
//! - **original_mb / optimized_mb**: summed sizes in MB
//! - **errors**: transcodes that fell back to a verbatim copy
//!
//! Category reduction percentages are guarded against zero total size, so an
//! empty run still prints a summary without dividing by zero.

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Manages progress reporting for media optimization
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Classification categories that carry statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Images,
    Videos,
}

/// Outcome of one transcode attempt. Built once per file, never mutated,
/// folded into the run summary immediately.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub source: PathBuf,
    pub output: PathBuf,
    pub original_size_mb: f64,
    pub optimized_size_mb: f64,
    pub reduction_percent: f64,
    pub success: bool,
    pub error: Option<String>,
}

impl ConversionResult {
    /// Record for a successful transcode.
    pub fn optimized(
        source: &Path,
        output: &Path,
        original_size_mb: f64,
        optimized_size_mb: f64,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            original_size_mb,
            optimized_size_mb,
            reduction_percent: FileManager::calculate_reduction(original_size_mb, optimized_size_mb),
            success: true,
            error: None,
        }
    }

    /// Record for a failed transcode whose destination received a verbatim
    /// copy of the source. Reduction is always zero on this path.
    pub fn fallback(
        source: &Path,
        output: &Path,
        original_size_mb: f64,
        copied_size_mb: f64,
        error: String,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            original_size_mb,
            optimized_size_mb: copied_size_mb,
            reduction_percent: 0.0,
            success: false,
            error: Some(error),
        }
    }
}

/// Running totals for one category.
#[derive(Debug, Default, Clone)]
pub struct CategoryStats {
    pub processed: usize,
    pub original_mb: f64,
    pub optimized_mb: f64,
    pub errors: usize,
}

impl CategoryStats {
    /// Fold one result into the totals.
    pub fn record(&mut self, result: &ConversionResult) {
        self.processed += 1;
        self.original_mb += result.original_size_mb;
        self.optimized_mb += result.optimized_size_mb;
        if !result.success {
            self.errors += 1;
        }
    }

    /// Aggregate reduction percentage, guarded against an empty category.
    pub fn reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.original_mb, self.optimized_mb)
    }
}

/// Statistics for a whole pipeline run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub images: CategoryStats,
    pub videos: CategoryStats,
    /// Files outside both media categories, copied verbatim.
    pub copied: usize,
    /// Verbatim copies that failed (logged, not fatal).
    pub copy_errors: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one conversion result into its category.
    pub fn record(&mut self, category: Category, result: &ConversionResult) {
        match category {
            Category::Images => self.images.record(result),
            Category::Videos => self.videos.record(result),
        }
    }

    pub fn note_copied(&mut self) {
        self.copied += 1;
    }

    pub fn note_copy_error(&mut self) {
        self.copy_errors += 1;
    }

    pub fn total_original_mb(&self) -> f64 {
        self.images.original_mb + self.videos.original_mb
    }

    pub fn total_optimized_mb(&self) -> f64 {
        self.images.optimized_mb + self.videos.optimized_mb
    }

    pub fn total_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_mb(), self.total_optimized_mb())
    }

    /// One-line wrap-up for the progress bar.
    pub fn format_summary(&self) -> String {
        format!(
            "Images: {} | Videos: {} | Copied: {} | Errors: {} | Saved: {:.2} MB ({:.1}%)",
            self.images.processed,
            self.videos.processed,
            self.copied,
            self.images.errors + self.videos.errors,
            self.total_original_mb() - self.total_optimized_mb(),
            self.total_reduction_percent()
        )
    }

    /// Final per-category and grand-total report.
    pub fn log_report(&self) {
        info!("=== Optimization Complete ===");

        for (label, stats) in [("Images", &self.images), ("Videos", &self.videos)] {
            if stats.processed == 0 {
                continue;
            }
            info!("{}:", label);
            info!("  Processed: {}", stats.processed);
            info!("  Original size: {:.2} MB", stats.original_mb);
            info!("  Optimized size: {:.2} MB", stats.optimized_mb);
            info!("  Reduction: {:.1}%", stats.reduction_percent());
            if stats.errors > 0 {
                info!("  Errors: {}", stats.errors);
            }
        }

        if self.copied > 0 {
            info!("Copied verbatim: {} files", self.copied);
        }
        if self.copy_errors > 0 {
            info!("Copy errors: {}", self.copy_errors);
        }

        info!("Total:");
        info!("  Original: {:.2} MB", self.total_original_mb());
        info!("  Optimized: {:.2} MB", self.total_optimized_mb());
        info!(
            "  Savings: {:.2} MB ({:.1}%)",
            self.total_original_mb() - self.total_optimized_mb(),
            self.total_reduction_percent()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(original: f64, optimized: f64, success: bool) -> ConversionResult {
        if success {
            ConversionResult::optimized(Path::new("in.jpg"), Path::new("out.webp"), original, optimized)
        } else {
            ConversionResult::fallback(
                Path::new("in.jpg"),
                Path::new("out.jpg"),
                original,
                optimized,
                "boom".to_string(),
            )
        }
    }

    #[test]
    fn test_optimized_result_reduction() {
        let r = result(10.0, 2.5, true);
        assert!(r.success);
        assert!(r.error.is_none());
        assert!((r.reduction_percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_result_zero_reduction() {
        let r = result(10.0, 10.0, false);
        assert!(!r.success);
        assert_eq!(r.reduction_percent, 0.0);
        assert_eq!(r.error.as_deref(), Some("boom"));
        // optimized size is still defined (the copy's size)
        assert_eq!(r.optimized_size_mb, 10.0);
    }

    #[test]
    fn test_category_stats_fold() {
        let mut stats = CategoryStats::default();
        stats.record(&result(10.0, 5.0, true));
        stats.record(&result(6.0, 6.0, false));

        assert_eq!(stats.processed, 2);
        assert_eq!(stats.errors, 1);
        assert!((stats.original_mb - 16.0).abs() < 1e-9);
        assert!((stats.optimized_mb - 11.0).abs() < 1e-9);
        assert!((stats.reduction_percent() - 31.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_no_division_by_zero() {
        let summary = RunSummary::new();
        assert_eq!(summary.total_reduction_percent(), 0.0);
        assert_eq!(summary.images.reduction_percent(), 0.0);
        // format_summary must not panic on an empty run
        let line = summary.format_summary();
        assert!(line.contains("Images: 0"));
    }

    #[test]
    fn test_summary_routes_categories() {
        let mut summary = RunSummary::new();
        summary.record(Category::Images, &result(4.0, 2.0, true));
        summary.record(Category::Videos, &result(8.0, 4.0, true));
        summary.note_copied();

        assert_eq!(summary.images.processed, 1);
        assert_eq!(summary.videos.processed, 1);
        assert_eq!(summary.copied, 1);
        assert!((summary.total_original_mb() - 12.0).abs() < 1e-9);
        assert!((summary.total_reduction_percent() - 50.0).abs() < 1e-9);
    }
}
