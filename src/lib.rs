//! # Web Asset Optimizer Library
//!
//! Batch-converts a directory tree of images (and optionally videos) into
//! smaller web-optimized copies, mirroring the directory structure at the
//! destination and reporting per-file and aggregate size reductions.
//!
//! ## Module layout:
//! - `config`: Pipeline configuration and validation
//! - `error`: Typed errors for every transcode failure kind
//! - `file_manager`: File discovery, classification and verbatim copies
//! - `image_processor`: In-process image resize + re-encode (WebP/JPEG/PNG)
//! - `video_processor`: Video scale + re-encode via external FFmpeg
//! - `optimizer`: Sequential orchestrator for a whole source tree
//! - `progress`: Progress bar, per-file results and category statistics
//!
//! ## Usage:
//! ```rust,no_run
//! use web_asset_optimizer::{Config, MediaOptimizer};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let optimizer = MediaOptimizer::new("Servicios", "ServiciosOptimized", Config::media())?;
//! let summary = optimizer.run().await?;
//! println!("images processed: {}", summary.images.processed);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod optimizer;
pub mod platform;
pub mod progress;
pub mod video_processor;

pub use config::Config;
pub use error::OptimizeError;
pub use optimizer::MediaOptimizer;
pub use progress::{Category, CategoryStats, ConversionResult, RunSummary};
