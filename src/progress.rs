//! # Progress Tracking and Statistics Module
//!
//! Visual progress reporting for CLI batch runs and cumulative statistics
//! over batch results.
//!
//! ## Components:
//! - `ProgressManager`: indicatif progress bar fed from the batch progress
//!   callback
//! - `OptimizationStats`: counts processed/optimized/fallback items and
//!   tracks bytes saved
//!
//! ## Visual feedback:
//! ```text
//! [00:00:02] [========================================] 12/12 (100%) gallery-04.webp: 45.2% saved
//! ```

use crate::optimizer::BatchItem;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages the progress bar for a batch run
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

    /// Advance by one item with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Set a custom message without incrementing
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for batch results
#[derive(Debug, Default)]
pub struct OptimizationStats {
    pub files_processed: usize,
    pub files_optimized: usize,
    pub files_fallback: usize,
    pub total_original_size: u64,
    pub total_bytes_saved: u64,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one settled batch item
    pub fn record(&mut self, item: &BatchItem) {
        self.files_processed += 1;
        match item {
            BatchItem::Optimized(img) => {
                self.files_optimized += 1;
                self.total_original_size += img.original_size;
                self.total_bytes_saved += img
                    .original_size
                    .saturating_sub(img.optimized_size());
            }
            BatchItem::Original(src) => {
                self.files_fallback += 1;
                self.total_original_size += src.size();
            }
        }
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_original_size > 0 {
            (self.total_bytes_saved as f64 / self.total_original_size as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Optimized: {} | Fallbacks: {} | Total saved: {} ({:.2}%)",
            self.files_processed,
            self.files_optimized,
            self.files_fallback,
            crate::file_manager::FileManager::format_size(self.total_bytes_saved),
            self.overall_reduction_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_processor::{OptimizedImage, SourceImage};

    fn optimized(original_size: u64, output_len: usize) -> BatchItem {
        BatchItem::Optimized(OptimizedImage {
            name: "a.webp".to_string(),
            media_type: "image/webp".to_string(),
            bytes: vec![0; output_len],
            width: 1,
            height: 1,
            original_size,
        })
    }

    #[test]
    fn test_stats_accounting() {
        let mut stats = OptimizationStats::new();

        stats.record(&optimized(1000, 400));
        stats.record(&BatchItem::Original(SourceImage::new(
            "b.jpg",
            "image/jpeg",
            vec![0; 500],
        )));

        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_optimized, 1);
        assert_eq!(stats.files_fallback, 1);
        assert_eq!(stats.total_original_size, 1500);
        assert_eq!(stats.total_bytes_saved, 600);
        assert!((stats.overall_reduction_percent() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_empty_reduction_is_zero() {
        let stats = OptimizationStats::new();
        assert_eq!(stats.overall_reduction_percent(), 0.0);
    }

    #[test]
    fn test_stats_saturate_when_output_grew() {
        // Re-encoding a tiny PNG to WebP can grow the file; saved bytes
        // saturate at zero instead of underflowing.
        let mut stats = OptimizationStats::new();
        stats.record(&optimized(100, 250));
        assert_eq!(stats.total_bytes_saved, 0);
    }
}
