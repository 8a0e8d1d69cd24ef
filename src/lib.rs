//! # Sub-city Image Optimizer Library
//!
//! Image optimization pipeline for the sub-city administration portal's
//! upload flows. Uploaded photos are constrained to a purpose-specific
//! bounding box and re-encoded (WebP by default) before they are handed to
//! the object store, cutting storage and bandwidth without visible quality
//! loss.
//!
//! ## Module architecture:
//! - `profile`: per-purpose resize/quality/format profiles
//! - `error`: error taxonomy for the pipeline
//! - `image_processor`: single-image decode/resize/encode
//! - `optimizer`: sequential batch orchestration with per-item fallback
//! - `config`: run configuration and overrides
//! - `file_manager`: file discovery and size utilities for the CLI
//! - `progress`: progress bar and batch statistics
//! - `json_output`: structured events for programmatic consumers
//!
//! ## Usage:
//! ```rust,no_run
//! use subcity_image_optimizer::{BatchOptimizer, SourceImage};
//!
//! # async fn run() {
//! let optimizer = BatchOptimizer::for_purpose("gallery");
//! let files = vec![SourceImage::new("photo.jpg", "image/jpeg", vec![])];
//! let results = optimizer
//!     .optimize_batch_with_progress(files, |done, total| {
//!         println!("{done}/{total}");
//!     })
//!     .await;
//! # let _ = results;
//! # }
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod optimizer;
pub mod profile;
pub mod progress;

pub use config::Config;
pub use error::OptimizeError;
pub use image_processor::{ImageProcessor, OptimizedImage, SourceImage};
pub use optimizer::{BatchItem, BatchOptimizer};
pub use profile::{resolve_profile, OutputFormat, Profile, Purpose};
