//! # Optimization Profiles Module
//!
//! Resize and re-encode parameters keyed by upload purpose.
//!
//! ## Responsibilities:
//! - Defines `Profile` with bounding box, quality and output format
//! - Defines the fixed per-purpose table (`news`, `institution`, `gallery`,
//!   `thumbnail`)
//! - Resolves purpose tags to profiles, falling back to `news` for unknown
//!   tags so an upload is never blocked by a typo
//!
//! ## Profile table:
//!
//! | purpose     | box       | quality | format |
//! |-------------|-----------|---------|--------|
//! | news        | 1920x1080 | 0.88    | webp   |
//! | institution | 1200x1200 | 0.90    | webp   |
//! | gallery     | 2560x2560 | 0.92    | webp   |
//! | thumbnail   | 600x600   | 0.85    | webp   |
//!
//! `Profile::default()` is the generic upload profile (1920x1920, 0.88, webp)
//! used when no purpose is given at all.

use serde::{Deserialize, Serialize};

/// Output encoding for optimized images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Webp,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Canonical file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Media type of the encoded output
    pub fn media_type(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "image/webp",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "webp" => Ok(OutputFormat::Webp),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Intended use of an uploaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    News,
    Institution,
    Gallery,
    Thumbnail,
}

impl Purpose {
    /// Parse a purpose tag. Unknown tags resolve to `News` rather than
    /// failing: the upload flow must not be blocked by an unexpected tag.
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "institution" => Purpose::Institution,
            "gallery" => Purpose::Gallery,
            "thumbnail" => Purpose::Thumbnail,
            _ => Purpose::News,
        }
    }
}

/// Resize and re-encode parameters for one upload purpose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Maximum output width in pixels
    pub max_width: u32,
    /// Maximum output height in pixels
    pub max_height: u32,
    /// Encoder quality in (0, 1]
    pub quality: f32,
    /// Output encoding
    pub output_format: OutputFormat,
}

impl Default for Profile {
    /// Generic upload profile applied when no purpose is given
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1920,
            quality: 0.88,
            output_format: OutputFormat::Webp,
        }
    }
}

impl Profile {
    /// Fixed profile table keyed by purpose
    pub fn for_purpose(purpose: Purpose) -> Self {
        match purpose {
            Purpose::News => Self {
                max_width: 1920,
                max_height: 1080,
                quality: 0.88,
                output_format: OutputFormat::Webp,
            },
            Purpose::Institution => Self {
                max_width: 1200,
                max_height: 1200,
                quality: 0.90,
                output_format: OutputFormat::Webp,
            },
            Purpose::Gallery => Self {
                max_width: 2560,
                max_height: 2560,
                quality: 0.92,
                output_format: OutputFormat::Webp,
            },
            Purpose::Thumbnail => Self {
                max_width: 600,
                max_height: 600,
                quality: 0.85,
                output_format: OutputFormat::Webp,
            },
        }
    }
}

/// Look up the optimization profile for a purpose tag.
///
/// Unknown tags resolve to the `news` profile.
pub fn resolve_profile(purpose: &str) -> Profile {
    Profile::for_purpose(Purpose::parse(purpose))
}
