//! # File Management Module
//!
//! ## Responsibilities:
//! - Recursive discovery of every regular file under a source root
//! - Classification by extension (image, video, everything else)
//! - Verbatim copies that preserve the source modification time
//! - Size helpers shared by processors and reporting
//!
//! ## Classification:
//! Extension membership is checked literally against both the lower- and
//! upper-case spellings. Mixed-case extensions (`.Jpg`) intentionally fall
//! through to the verbatim-copy route.
//!
//! - **Images**: jpg, jpeg, png, webp (+ uppercase)
//! - **Videos**: mp4, mov, avi, mkv (+ uppercase)

use anyhow::Result;
use filetime::FileTime;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Route assigned to a source file by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Find every regular file under a directory, in traversal order.
    pub fn find_files(source_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(source_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            files.push(entry.path().to_path_buf());
        }

        Ok(files)
    }

    /// Classify a file by extension. Videos are only routed to the video
    /// processor when the pipeline includes them; otherwise they copy.
    pub fn classify(path: &Path, include_videos: bool) -> MediaKind {
        if Self::is_image(path) {
            MediaKind::Image
        } else if include_videos && Self::is_video(path) {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }

    /// Check if a file is an image
    pub fn is_image(path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => matches!(
                ext,
                "jpg" | "jpeg" | "png" | "webp" | "JPG" | "JPEG" | "PNG" | "WEBP"
            ),
            None => false,
        }
    }

    /// Check if a file is a video
    pub fn is_video(path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => matches!(ext, "mp4" | "mov" | "avi" | "mkv" | "MP4" | "MOV" | "AVI" | "MKV"),
            None => false,
        }
    }

    /// Copy a file byte-for-byte, creating parent directories and carrying
    /// the source modification time over to the destination.
    pub fn copy_verbatim(source: &Path, dest: &Path) -> std::io::Result<u64> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let bytes = std::fs::copy(source, dest)?;

        let metadata = std::fs::metadata(source)?;
        let mtime = FileTime::from_last_modification_time(&metadata);
        filetime::set_file_mtime(dest, mtime)?;

        Ok(bytes)
    }

    /// File size in megabytes, the unit used by all reporting.
    pub fn file_size_mb(path: &Path) -> std::io::Result<f64> {
        let metadata = std::fs::metadata(path)?;
        Ok(metadata.len() as f64 / BYTES_PER_MB)
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Percentage reduction between two sizes in MB, guarded against a
    /// zero-sized original.
    pub fn calculate_reduction(original_mb: f64, optimized_mb: f64) -> f64 {
        if original_mb > 0.0 {
            (1.0 - optimized_mb / original_mb) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_classify_images() {
        assert_eq!(
            FileManager::classify(Path::new("a/photo.jpg"), true),
            MediaKind::Image
        );
        assert_eq!(
            FileManager::classify(Path::new("PHOTO.JPEG"), false),
            MediaKind::Image
        );
        assert_eq!(
            FileManager::classify(Path::new("x.png"), true),
            MediaKind::Image
        );
        assert_eq!(
            FileManager::classify(Path::new("x.webp"), true),
            MediaKind::Image
        );
    }

    #[test]
    fn test_classify_videos() {
        assert_eq!(
            FileManager::classify(Path::new("clip.mp4"), true),
            MediaKind::Video
        );
        assert_eq!(
            FileManager::classify(Path::new("clip.MOV"), true),
            MediaKind::Video
        );
        // Video extensions route to copy when the pipeline excludes videos
        assert_eq!(
            FileManager::classify(Path::new("clip.mp4"), false),
            MediaKind::Other
        );
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(
            FileManager::classify(Path::new("notes.txt"), true),
            MediaKind::Other
        );
        assert_eq!(
            FileManager::classify(Path::new("archive.pdf"), true),
            MediaKind::Other
        );
        assert_eq!(FileManager::classify(Path::new("no_ext"), true), MediaKind::Other);
        // Mixed-case extensions are not in either set
        assert_eq!(
            FileManager::classify(Path::new("photo.Jpg"), true),
            MediaKind::Other
        );
    }

    #[test]
    fn test_find_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join("top.txt"), b"top").unwrap();
        std::fs::write(nested.join("deep.jpg"), b"deep").unwrap();

        let files = FileManager::find_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.ends_with("top.txt")));
        assert!(files.iter().any(|f| f.ends_with("a/b/deep.jpg")));
    }

    #[test]
    fn test_copy_verbatim_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.bin");
        std::fs::write(&source, b"payload").unwrap();

        let dest = temp_dir.path().join("out/nested/source.bin");
        let bytes = FileManager::copy_verbatim(&source, &dest).unwrap();

        assert_eq!(bytes, 7);
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert!((FileManager::calculate_reduction(10.0, 5.0) - 50.0).abs() < f64::EPSILON);
        assert!((FileManager::calculate_reduction(4.0, 1.0) - 75.0).abs() < f64::EPSILON);
        // Division-by-zero guard
        assert_eq!(FileManager::calculate_reduction(0.0, 0.0), 0.0);
    }
}
