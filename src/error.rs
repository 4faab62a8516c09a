//! # Error Types Module
//!
//! ## Responsibilities:
//! - Defines `OptimizeError` covering every per-file transcode failure kind
//! - Integrates with `thiserror` for automatic error conversion
//!
//! ## Error categories:
//! - `Io`: filesystem errors (missing files, permissions, etc.)
//! - `Decode`: the image library rejected the source file
//! - `Encode`: the target encoder failed or no encoder exists for the format
//! - `ToolMissing`: FFmpeg is not installed or not on PATH
//! - `ToolFailed`: FFmpeg exited with a non-zero status
//! - `ToolTimeout`: FFmpeg exceeded the per-file wall-clock budget
//!
//! Per-file errors never escape the processors: both convert any of these
//! into a failed `ConversionResult` backed by a verbatim copy of the source.

/// Errors produced while transcoding a single media file.
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image encode error: {0}")]
    Encode(String),

    #[error("ffmpeg tool not found")]
    ToolMissing,

    #[error("ffmpeg exited with {status}: {stderr}")]
    ToolFailed { status: i32, stderr: String },

    #[error("ffmpeg timed out after {0} seconds")]
    ToolTimeout(u64),
}
