//! # File Management Module
//!
//! File discovery and size utilities for the CLI side of the pipeline.
//!
//! ## Responsibilities:
//! - Recursive discovery of image files in a directory
//! - Media type mapping from file extensions
//! - Loading files into `SourceImage` values
//! - Human-readable size formatting and reduction percentages
//!
//! The optimizer itself never touches the filesystem; everything here exists
//! for the `image-optimizer` binary, which stands in for the upload form as
//! the supplier of files.

use crate::image_processor::SourceImage;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Find all supported image files under a directory.
    ///
    /// Results are sorted so batch slots pair deterministically with
    /// discovery order.
    pub fn find_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if Self::is_image(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Check if a file has a supported image extension
    pub fn is_image(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            matches!(ext_lower.as_str(), "jpg" | "jpeg" | "png" | "webp")
        } else {
            false
        }
    }

    /// Media type for a path, from its extension. Unknown extensions map to
    /// `application/octet-stream`, which the optimizer rejects as
    /// `NotAnImage`.
    pub fn media_type_for_path(path: &Path) -> &'static str {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }

    /// Read a file into a `SourceImage`
    pub async fn load_source(path: &Path) -> Result<SourceImage> {
        let name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?
            .to_string_lossy()
            .into_owned();
        let media_type = Self::media_type_for_path(path);
        let bytes = tokio::fs::read(path).await?;

        Ok(SourceImage::new(name, media_type, bytes))
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

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(FileManager::is_image(Path::new("photo.JPG")));
        assert!(FileManager::is_image(Path::new("a/b/pic.webp")));
        assert!(!FileManager::is_image(Path::new("video.mp4")));
        assert!(!FileManager::is_image(Path::new("README")));
    }

    #[test]
    fn test_media_type_for_path() {
        assert_eq!(
            FileManager::media_type_for_path(Path::new("x.jpeg")),
            "image/jpeg"
        );
        assert_eq!(
            FileManager::media_type_for_path(Path::new("x.PNG")),
            "image/png"
        );
        assert_eq!(
            FileManager::media_type_for_path(Path::new("x.pdf")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert!((FileManager::calculate_reduction(1000, 250) - 75.0).abs() < f64::EPSILON);
        assert_eq!(FileManager::calculate_reduction(0, 100), 0.0);
        assert!(FileManager::calculate_reduction(100, 150) < 0.0);
    }
}
