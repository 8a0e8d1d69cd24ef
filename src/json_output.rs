//! # JSON Output Module
//!
//! Structured JSON events for driving the pipeline from another process
//! (the admin tooling wraps the binary and renders its own progress UI).
//!
//! ## Message types:
//! - `start`: batch begins, with the resolved profile
//! - `file_complete`: one item settled, optimized or fallback
//! - `complete`: batch finished with aggregate statistics
//! - `error`: fatal error before or during the run
//!
//! One message per line on stdout.

use crate::optimizer::BatchItem;
use crate::progress::OptimizationStats;
use serde::{Deserialize, Serialize};

/// JSON message type
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Batch run started
    #[serde(rename = "start")]
    Start {
        purpose: String,
        total_files: usize,
        max_width: u32,
        max_height: u32,
        quality: f32,
        output_format: String,
    },

    /// One batch item settled
    #[serde(rename = "file_complete")]
    FileComplete {
        name: String,
        original_size: u64,
        upload_size: u64,
        reduction_percent: f64,
        fallback: bool,
    },

    /// Batch run completed
    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_optimized: usize,
        files_fallback: usize,
        total_bytes_saved: u64,
        average_reduction: f64,
        duration_seconds: f64,
    },

    /// Fatal error
    #[serde(rename = "error")]
    Error { message: String },
}

impl JsonMessage {
    /// Emit the message as one JSON line on stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{json}");
        }
    }

    /// Build a `file_complete` message for a settled batch item
    pub fn file_complete(item: &BatchItem) -> Self {
        match item {
            BatchItem::Optimized(img) => Self::FileComplete {
                name: img.name.clone(),
                original_size: img.original_size,
                upload_size: img.optimized_size(),
                reduction_percent: round_one_decimal(img.reduction_percent()),
                fallback: false,
            },
            BatchItem::Original(src) => Self::FileComplete {
                name: src.name.clone(),
                original_size: src.size(),
                upload_size: src.size(),
                reduction_percent: 0.0,
                fallback: true,
            },
        }
    }

    /// Build a `complete` message from aggregate statistics
    pub fn complete(stats: &OptimizationStats, duration_seconds: f64) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_optimized: stats.files_optimized,
            files_fallback: stats.files_fallback,
            total_bytes_saved: stats.total_bytes_saved,
            average_reduction: round_one_decimal(stats.overall_reduction_percent()),
            duration_seconds,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
