//! # Image Processing Module
//!
//! In-memory optimization of a single uploaded image: decode, constrain to a
//! profile's bounding box, re-encode at the profile's quality.
//!
//! ## Pipeline
//!
//! 1. **Media type check**: non-`image/*` uploads are rejected before any
//!    decoding work
//! 2. **Decode**: `image::load_from_memory`, any raster format the `image`
//!    crate understands (JPEG, PNG, WebP)
//! 3. **Target dimensions**: the dominant axis is clamped to its bound and
//!    the other follows from the aspect ratio; images already inside the box
//!    are never upscaled
//! 4. **Resample**: Lanczos3, sharp downsizing artifacts are unacceptable for
//!    the public gallery
//! 5. **Encode**: WebP (lossy, via libwebp bindings), JPEG, or PNG (lossless,
//!    quality does not apply)
//! 6. **Report**: derived file name plus byte-size reduction statistics
//!
//! ## Dimension policy
//!
//! Only the dominant axis is clamped. For extreme aspect ratios the minor
//! axis can end up outside its own bound (square sources against the
//! 1920x1080 news box) or degenerate to 1px (banner strips). This mirrors
//! what the upload flows have always produced and is covered by tests rather
//! than special-cased.
//!
//! ## Concurrency
//!
//! `optimize` is async but the pixel work is CPU-bound, so it runs on the
//! tokio blocking pool. One image is processed per call; the batch layer in
//! `optimizer` serializes calls and never overlaps them.
//!
//! ## Errors
//!
//! Fails with `NotAnImage`, `Decode`, `Encode`, or `EmptyOutput`. No disk or
//! network I/O happens here; uploading the result is the caller's job.

use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::profile::{OutputFormat, Profile};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageEncoder};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// A raw uploaded file as received from the admin upload form
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Original file name, extension included
    pub name: String,
    /// Declared media type, e.g. `image/jpeg`
    pub media_type: String,
    /// Raw encoded bytes
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Size of the encoded bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the declared media type describes an image
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// An optimized image ready for upload, plus its size-reduction report
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    /// Derived file name: source base name with the output format's extension
    pub name: String,
    /// Media type of the encoded output
    pub media_type: String,
    /// Encoded output bytes
    pub bytes: Vec<u8>,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Byte size of the source it was produced from
    pub original_size: u64,
}

impl OptimizedImage {
    /// Size of the encoded output bytes
    pub fn optimized_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Percentage reduction relative to the source, `(1 - new/old) * 100`.
    ///
    /// Reported to one decimal place in logs and JSON output. Negative when
    /// re-encoding grew the file.
    pub fn reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.original_size, self.optimized_size())
    }
}

/// Optimizes single images according to a fixed profile
pub struct ImageProcessor {
    profile: Profile,
}

impl ImageProcessor {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Optimize one uploaded image.
    ///
    /// Validates the declared media type, decodes, constrains dimensions to
    /// the profile's bounding box preserving aspect ratio, re-encodes at the
    /// profile's quality, and returns the result with a size-reduction
    /// report. The source is not mutated or retained.
    ///
    /// # Errors
    /// - `NotAnImage` if the media type is not `image/*` (checked before any
    ///   decode work)
    /// - `Decode` if the bytes are not a decodable raster image
    /// - `Encode` / `EmptyOutput` if re-encoding fails or yields no bytes
    pub async fn optimize(&self, source: &SourceImage) -> Result<OptimizedImage, OptimizeError> {
        if !source.is_image() {
            return Err(OptimizeError::NotAnImage(source.media_type.clone()));
        }

        let profile = self.profile;
        let bytes = source.bytes.clone();
        let (output, width, height) =
            tokio::task::spawn_blocking(move || optimize_bytes(&bytes, &profile)).await??;

        let optimized = OptimizedImage {
            name: derive_output_name(&source.name, profile.output_format),
            media_type: profile.output_format.media_type().to_string(),
            bytes: output,
            width,
            height,
            original_size: source.size(),
        };

        info!(
            "Image optimized: {} {} -> {} ({:.1}% reduction)",
            source.name,
            FileManager::format_size(optimized.original_size),
            FileManager::format_size(optimized.optimized_size()),
            optimized.reduction_percent()
        );

        Ok(optimized)
    }
}

/// Compute the output dimensions for a source within a bounding box.
///
/// Sources already inside the box keep their dimensions (no upscaling).
/// Otherwise the dominant axis is clamped to its bound and the other axis
/// follows from the aspect ratio, rounded to the nearest integer with a
/// floor of 1.
pub fn target_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = width as f64 / height as f64;
    let (w, h) = if width >= height {
        (max_width as f64, max_width as f64 / ratio)
    } else {
        (max_height as f64 * ratio, max_height as f64)
    };

    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Decode, resize and re-encode one image. Runs on the blocking pool.
fn optimize_bytes(bytes: &[u8], profile: &Profile) -> Result<(Vec<u8>, u32, u32), OptimizeError> {
    let img = image::load_from_memory(bytes).map_err(OptimizeError::Decode)?;

    let (width, height) = img.dimensions();
    let (target_w, target_h) =
        target_dimensions(width, height, profile.max_width, profile.max_height);

    let resized = if (target_w, target_h) == (width, height) {
        img
    } else {
        debug!("Resizing {}x{} -> {}x{}", width, height, target_w, target_h);
        img.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };

    let output = encode(&resized, profile)?;
    if output.is_empty() {
        return Err(OptimizeError::EmptyOutput);
    }

    Ok((output, target_w, target_h))
}

fn encode(img: &DynamicImage, profile: &Profile) -> Result<Vec<u8>, OptimizeError> {
    match profile.output_format {
        OutputFormat::Webp => encode_webp(img, profile.quality),
        OutputFormat::Jpeg => encode_jpeg(img, profile.quality),
        OutputFormat::Png => encode_png(img),
    }
}

/// Lossy WebP via libwebp. The encoder works on raw RGB/RGBA planes.
fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, OptimizeError> {
    let quality = (quality * 100.0).clamp(1.0, 100.0);

    let output = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height()).encode(quality)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height()).encode(quality)
    };

    Ok(output.to_vec())
}

fn encode_jpeg(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, OptimizeError> {
    let quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let rgb = img.to_rgb8();

    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), image::ColorType::Rgb8)
        .map_err(OptimizeError::Encode)?;

    Ok(buffer)
}

/// PNG is lossless; the profile quality does not apply.
fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, OptimizeError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    img.write_to(&mut cursor, image::ImageFormat::Png)
        .map_err(OptimizeError::Encode)?;

    Ok(buffer)
}

/// Replace the source file's extension with the canonical extension for the
/// output format. Names without an extension get one appended.
fn derive_output_name(name: &str, format: OutputFormat) -> String {
    Path::new(name)
        .with_extension(format.extension())
        .to_string_lossy()
        .into_owned()
}
