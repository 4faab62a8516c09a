//! # Image Processing Module
//!
//! ## Responsibilities:
//! - In-process image transcoding: decode, normalize, downscale, re-encode
//! - Aggressive web presets: WebP output at the configured quality
//! - Per-file failure isolation with a verbatim-copy fallback
//!
//! ## Pipeline per image:
//! 1. Decode the source with the `image` crate
//! 2. Normalize color: alpha and palette sources are flattened onto an
//!    opaque white background (the lossy encoders get plain RGB)
//! 3. Downscale with Lanczos when either dimension exceeds the configured
//!    bound, preserving aspect ratio with the smaller of the two limit
//!    ratios. Images already within bounds pass through untouched.
//! 4. Encode: WebP (extension forced to `.webp`) when conversion is enabled,
//!    otherwise the original format at the configured quality
//!
//! ## Failure policy:
//! Any decode, resize or encode error is caught here: the untouched original
//! bytes are copied to the destination, the error text is recorded on the
//! result, and the reduction is reported as 0%. Only a failure of that
//! fallback copy itself propagates to the caller.

use crate::config::Config;
use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::progress::ConversionResult;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Handles image optimization
pub struct ImageProcessor {
    config: Config,
}

impl ImageProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Transcode one image, falling back to a verbatim copy on any error.
    ///
    /// Always returns a `ConversionResult`; the only error that escapes is
    /// a filesystem failure of the fallback copy itself.
    pub fn optimize(&self, input: &Path, dest: &Path) -> Result<ConversionResult> {
        let original_mb = FileManager::file_size_mb(input)
            .with_context(|| format!("failed to stat source file {}", input.display()))?;

        match self.transcode(input, dest) {
            Ok(output) => {
                let optimized_mb = FileManager::file_size_mb(&output)
                    .with_context(|| format!("failed to stat output file {}", output.display()))?;
                Ok(ConversionResult::optimized(input, &output, original_mb, optimized_mb))
            }
            Err(e) => {
                warn!("Image transcode failed for {}: {}", input.display(), e);
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

    fn transcode(&self, input: &Path, dest: &Path) -> Result<PathBuf, OptimizeError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::open(input)?;
        let rgb = flatten_to_rgb(&img);

        let (width, height) = rgb.dimensions();
        let rgb = if width > self.config.image_max_width || height > self.config.image_max_height {
            let (new_width, new_height) = bounded_dimensions(
                width,
                height,
                self.config.image_max_width,
                self.config.image_max_height,
            );
            debug!(
                "Resizing {} from {}x{} to {}x{}",
                input.display(),
                width,
                height,
                new_width,
                new_height
            );
            image::imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3)
        } else {
            rgb
        };

        let output = if self.config.convert_to_webp {
            dest.with_extension("webp")
        } else {
            dest.to_path_buf()
        };

        self.encode(&rgb, &output)?;
        Ok(output)
    }

    /// Encode an RGB buffer to the format implied by the output extension.
    fn encode(&self, rgb: &RgbImage, output: &Path) -> Result<(), OptimizeError> {
        let ext = output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "webp" => {
                let (width, height) = rgb.dimensions();
                let encoder = webp::Encoder::from_rgb(rgb.as_raw(), width, height);
                let encoded = encoder.encode(self.config.image_quality as f32);
                std::fs::write(output, &*encoded)?;
            }
            "jpg" | "jpeg" => {
                let file = std::fs::File::create(output)?;
                let mut writer = std::io::BufWriter::new(file);
                image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut writer,
                    self.config.image_quality,
                )
                .encode_image(rgb)
                .map_err(|e| OptimizeError::Encode(e.to_string()))?;
            }
            "png" => {
                rgb.save(output)
                    .map_err(|e| OptimizeError::Encode(e.to_string()))?;
            }
            other => {
                return Err(OptimizeError::Encode(format!(
                    "no encoder for .{} output",
                    other
                )));
            }
        }

        Ok(())
    }
}

/// Flatten any alpha channel onto an opaque white background; opaque
/// sources convert straight to RGB. Palette images arrive from the decoder
/// already expanded, so the alpha check covers them too.
fn flatten_to_rgb(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blended = out.get_pixel_mut(x, y);
        for channel in 0..3 {
            let value = pixel[channel] as u32;
            blended[channel] = ((value * alpha + 255 * (255 - alpha)) / 255) as u8;
        }
    }

    out
}

/// New dimensions for an image exceeding its bounds: the smaller of the two
/// limit ratios keeps the aspect ratio and never upscales.
fn bounded_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let new_width = ((width as f64 * ratio) as u32).max(1);
    let new_height = ((height as f64 * ratio) as u32).max(1);
    (new_width, new_height)
}
