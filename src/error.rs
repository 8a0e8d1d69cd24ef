//! # Error Types Module
//!
//! Defines the error taxonomy for the upload optimization pipeline.
//!
//! ## Categories:
//! - `NotAnImage`: declared media type does not describe a raster image
//! - `Decode`: bytes could not be decoded as an image
//! - `Encode`: re-encoding failed
//! - `EmptyOutput`: the encoder returned zero bytes
//! - `Task`: a blocking decode/encode task failed to join
//!
//! `ImageProcessor::optimize` surfaces all of these to its caller. The batch
//! optimizer catches them per item and substitutes the original file instead,
//! so a single corrupt upload never blocks the rest of a batch. CLI-side
//! file and configuration errors are propagated with `anyhow` and never
//! reach this taxonomy.

/// Errors produced while optimizing upload images
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("not an image: declared media type is `{0}`")]
    NotAnImage(String),

    #[error("image decode failed: {0}")]
    Decode(#[source] image::ImageError),

    #[error("image encode failed: {0}")]
    Encode(#[source] image::ImageError),

    #[error("encoder produced no output")]
    EmptyOutput,

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
