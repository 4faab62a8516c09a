//! # Configuration Management Module
//!
//! ## Responsibilities:
//! - Defines the `Config` struct with all optimization parameters
//! - Provides the two fixed pipeline presets (media and images-only)
//! - Validates parameters before a run starts
//! - Supports loading/saving configuration as JSON
//!
//! ## Parameters:
//! - `image_quality`: WebP/JPEG quality (1-100, default: 75)
//! - `image_max_width` / `image_max_height`: downscale bounds (1920x1080)
//! - `convert_to_webp`: force `.webp` output for images (default: true)
//! - `include_videos`: route video extensions to FFmpeg (media pipeline only)
//! - `video_crf`: CRF (0-51, default: 28, higher = smaller files)
//! - `video_max_height`: scale bound, width derived from aspect ratio (720)
//! - `audio_bitrate`: AAC re-encode bitrate (default: "96k")
//! - `video_preset`: x264 encoding preset (default: "slow")
//! - `video_timeout_secs`: wall-clock bound per FFmpeg invocation (600)
//!
//! The pipelines run with fixed presets; the struct exists so tests can
//! exercise alternate thresholds without touching global state.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one optimization pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Image quality for WebP/JPEG encoding (1-100)
    pub image_quality: u8,
    /// Maximum output image width in pixels
    pub image_max_width: u32,
    /// Maximum output image height in pixels
    pub image_max_height: u32,
    /// Convert every image to WebP (forces the `.webp` extension)
    pub convert_to_webp: bool,
    /// Process video files (false = videos fall through to verbatim copy)
    pub include_videos: bool,
    /// Video CRF value (0-51, higher = more compression)
    pub video_crf: u8,
    /// Maximum output video height in pixels (width derived, never upscaled)
    pub video_max_height: u32,
    /// Audio bitrate for AAC re-encoding
    pub audio_bitrate: String,
    /// x264 encoding preset
    pub video_preset: String,
    /// Wall-clock timeout per FFmpeg invocation, in seconds
    pub video_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::media()
    }
}

impl Config {
    /// Preset for the media pipeline: aggressive web compression of
    /// images (WebP q75, max 1920x1080) and videos (CRF 28, max 720p).
    pub fn media() -> Self {
        Self {
            image_quality: 75,
            image_max_width: 1920,
            image_max_height: 1080,
            convert_to_webp: true,
            include_videos: true,
            video_crf: 28,
            video_max_height: 720,
            audio_bitrate: "96k".to_string(),
            video_preset: "slow".to_string(),
            video_timeout_secs: 600,
        }
    }

    /// Preset for the product pipeline: images only, same image settings.
    pub fn images_only() -> Self {
        Self {
            include_videos: false,
            ..Self::media()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.image_quality == 0 || self.image_quality > 100 {
            return Err(anyhow::anyhow!("Image quality must be between 1 and 100"));
        }

        if self.image_max_width == 0 || self.image_max_height == 0 {
            return Err(anyhow::anyhow!("Image size bounds must be greater than 0"));
        }

        if self.video_crf > 51 {
            return Err(anyhow::anyhow!("Video CRF must be between 0 and 51"));
        }

        if self.video_max_height == 0 {
            return Err(anyhow::anyhow!("Video max height must be greater than 0"));
        }

        if self.video_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Video timeout must be greater than 0"));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
