//! # Batch Optimizer Module
//!
//! Orchestrates optimization of a sequence of uploaded images for the admin
//! multi-file upload flows (article images, gallery photos, institution
//! logos).
//!
//! ## Behavior:
//! - Files are processed strictly in input order, one full
//!   decode/resample/encode cycle at a time. The caller's UI pairs results
//!   positionally with preview thumbnails, so order is part of the contract.
//! - Every input produces exactly one output slot: `results.len()` always
//!   equals `files.len()` and `results[i]` corresponds to `files[i]`.
//! - A failure of any kind (wrong media type, corrupt bytes, encoder error)
//!   is logged and the original file is passed through unchanged in that
//!   slot. The batch never aborts and never drops an item.
//! - The progress callback fires once per item, after the item settles,
//!   counting 1..=N with a constant total.
//!
//! ## Concurrency:
//! Items are awaited one at a time. Batches from the admin screens are a
//! handful of images, so throughput is not a design driver; what matters is
//! that progress counts stay predictable and results stay positional.
//! Cancellation is not supported: once started, a batch runs to completion
//! over its input.

use crate::image_processor::{ImageProcessor, OptimizedImage, SourceImage};
use crate::profile::{resolve_profile, Profile};
use tracing::{debug, warn};

/// Outcome of one batch slot.
///
/// The pass-through variant makes the "same length, positional
/// correspondence" guarantee structural: a failed item is carried as its
/// untouched source, not signaled out of band.
#[derive(Debug, Clone)]
pub enum BatchItem {
    /// Optimization succeeded; upload these bytes
    Optimized(OptimizedImage),
    /// Optimization failed; the untouched source is passed through
    Original(SourceImage),
}

impl BatchItem {
    /// File name to upload under: derived for optimized items, the source
    /// name for pass-throughs
    pub fn name(&self) -> &str {
        match self {
            BatchItem::Optimized(img) => &img.name,
            BatchItem::Original(src) => &src.name,
        }
    }

    pub fn media_type(&self) -> &str {
        match self {
            BatchItem::Optimized(img) => &img.media_type,
            BatchItem::Original(src) => &src.media_type,
        }
    }

    /// Bytes to upload, optimized or original
    pub fn bytes(&self) -> &[u8] {
        match self {
            BatchItem::Optimized(img) => &img.bytes,
            BatchItem::Original(src) => &src.bytes,
        }
    }

    pub fn upload_size(&self) -> u64 {
        self.bytes().len() as u64
    }

    pub fn is_optimized(&self) -> bool {
        matches!(self, BatchItem::Optimized(_))
    }
}

/// Sequential batch optimizer for admin upload flows
pub struct BatchOptimizer {
    processor: ImageProcessor,
}

impl BatchOptimizer {
    pub fn new(profile: Profile) -> Self {
        Self {
            processor: ImageProcessor::new(profile),
        }
    }

    /// Build a batch optimizer for a purpose tag. Unknown tags resolve to
    /// the `news` profile.
    pub fn for_purpose(purpose: &str) -> Self {
        Self::new(resolve_profile(purpose))
    }

    pub fn profile(&self) -> &Profile {
        self.processor.profile()
    }

    /// Optimize a batch without progress reporting. See
    /// [`optimize_batch_with_progress`](Self::optimize_batch_with_progress).
    pub async fn optimize_batch(&self, files: Vec<SourceImage>) -> Vec<BatchItem> {
        self.optimize_batch_with_progress(files, |_, _| {}).await
    }

    /// Optimize a batch of uploaded images in input order.
    ///
    /// `on_progress(done, total)` is invoked after each item settles,
    /// whether it optimized or fell back, so across a batch of N items the
    /// callback fires exactly N times with a strictly increasing first
    /// argument. An empty batch returns an empty result and fires no
    /// callbacks.
    ///
    /// Never fails: a per-item error of any kind is logged and the original
    /// file is carried through in that slot.
    pub async fn optimize_batch_with_progress<F>(
        &self,
        files: Vec<SourceImage>,
        mut on_progress: F,
    ) -> Vec<BatchItem>
    where
        F: FnMut(usize, usize),
    {
        let total = files.len();
        let mut results = Vec::with_capacity(total);

        for (index, source) in files.into_iter().enumerate() {
            match self.processor.optimize(&source).await {
                Ok(optimized) => {
                    debug!(
                        "Batch item {}/{}: {} optimized ({:.1}% reduction)",
                        index + 1,
                        total,
                        optimized.name,
                        optimized.reduction_percent()
                    );
                    results.push(BatchItem::Optimized(optimized));
                }
                Err(err) => {
                    warn!(
                        "Failed to optimize {}: {} - keeping original",
                        source.name, err
                    );
                    results.push(BatchItem::Original(source));
                }
            }

            on_progress(index + 1, total);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 60])
        }));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn image_source(name: &str, width: u32, height: u32) -> SourceImage {
        SourceImage::new(name, "image/png", encoded_png(width, height))
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let optimizer = BatchOptimizer::new(Profile::default());
        let mut calls = Vec::new();

        let results = optimizer
            .optimize_batch_with_progress(Vec::new(), |done, total| calls.push((done, total)))
            .await;

        assert!(results.is_empty());
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn test_batch_preserves_length_and_order() {
        let optimizer = BatchOptimizer::for_purpose("thumbnail");

        for n in 1u32..4 {
            let files: Vec<SourceImage> = (0..n)
                .map(|i| image_source(&format!("photo-{i}.png"), 32 + i, 32))
                .collect();

            let results = optimizer.optimize_batch(files).await;
            assert_eq!(results.len(), n as usize);
            for (i, item) in results.iter().enumerate() {
                assert_eq!(item.name(), format!("photo-{i}.webp"));
                assert!(item.is_optimized());
            }
        }
    }

    #[tokio::test]
    async fn test_batch_falls_back_to_original_on_bad_item() {
        let optimizer = BatchOptimizer::for_purpose("gallery");
        let bad_bytes = b"definitely not pixels".to_vec();

        let files = vec![
            image_source("first.png", 40, 20),
            // Mislabeled text file in the middle of the batch.
            SourceImage::new("report.jpg", "image/jpeg", bad_bytes.clone()),
            image_source("third.png", 20, 40),
        ];

        let results = optimizer.optimize_batch(files).await;
        assert_eq!(results.len(), 3);

        assert!(results[0].is_optimized());
        assert!(results[2].is_optimized());

        match &results[1] {
            BatchItem::Original(src) => {
                assert_eq!(src.name, "report.jpg");
                assert_eq!(src.bytes, bad_bytes);
            }
            other => panic!("expected pass-through at slot 1, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_progress_fires_once_per_item_including_fallbacks() {
        let optimizer = BatchOptimizer::for_purpose("news");
        let files = vec![
            image_source("a.png", 16, 16),
            SourceImage::new("b.bin", "application/octet-stream", vec![1, 2, 3]),
            image_source("c.png", 16, 16),
        ];

        let mut calls = Vec::new();
        let results = optimizer
            .optimize_batch_with_progress(files, |done, total| calls.push((done, total)))
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn test_unknown_purpose_uses_news_profile() {
        let optimizer = BatchOptimizer::for_purpose("no-such-purpose");
        assert_eq!(*optimizer.profile(), resolve_profile("news"));
    }
}
