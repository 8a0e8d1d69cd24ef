//! # Configuration Management Module
//!
//! Run configuration for the CLI: which profile to use and what, if
//! anything, to override on it.
//!
//! ## Parameters:
//! - `purpose`: profile tag (`news`, `institution`, `gallery`, `thumbnail`;
//!   unknown tags resolve to `news`)
//! - `quality`: encoder quality override, in (0, 1]
//! - `max_width` / `max_height`: bounding box overrides in pixels
//! - `output_format`: encoding override (`webp`, `jpeg`, `png`)
//! - `output_path`: directory for optimized files
//! - `json_output`: emit progress and results as JSON lines
//!
//! ## Validation:
//! - quality must be in (0, 1]
//! - dimension overrides must be greater than zero
//! - an output path must exist and be a directory

use crate::profile::{resolve_profile, OutputFormat, Profile};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upload purpose selecting the base profile
    pub purpose: String,
    /// Encoder quality override, in (0, 1]
    pub quality: Option<f32>,
    /// Maximum width override in pixels
    pub max_width: Option<u32>,
    /// Maximum height override in pixels
    pub max_height: Option<u32>,
    /// Output format override
    pub output_format: Option<OutputFormat>,
    /// Directory for optimized files
    pub output_path: Option<PathBuf>,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            purpose: "news".to_string(),
            quality: None,
            max_width: None,
            max_height: None,
            output_format: None,
            output_path: None,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if let Some(quality) = self.quality {
            if !(quality > 0.0 && quality <= 1.0) {
                return Err(anyhow::anyhow!("Quality must be in (0, 1]"));
            }
        }

        if self.max_width == Some(0) {
            return Err(anyhow::anyhow!("Max width must be greater than 0"));
        }

        if self.max_height == Some(0) {
            return Err(anyhow::anyhow!("Max height must be greater than 0"));
        }

        if let Some(ref output_path) = self.output_path {
            if !output_path.exists() {
                return Err(anyhow::anyhow!(
                    "Output path does not exist: {}",
                    output_path.display()
                ));
            }
            if !output_path.is_dir() {
                return Err(anyhow::anyhow!(
                    "Output path is not a directory: {}",
                    output_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Resolve the purpose to its profile and apply any overrides
    pub fn effective_profile(&self) -> Profile {
        let mut profile = resolve_profile(&self.purpose);

        if let Some(quality) = self.quality {
            profile.quality = quality;
        }
        if let Some(max_width) = self.max_width {
            profile.max_width = max_width;
        }
        if let Some(max_height) = self.max_height {
            profile.max_height = max_height;
        }
        if let Some(output_format) = self.output_format {
            profile.output_format = output_format;
        }

        profile
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.quality = Some(0.0);
        assert!(config.validate().is_err());

        config.quality = Some(1.5);
        assert!(config.validate().is_err());

        config.quality = Some(0.88);
        config.max_width = Some(0);
        assert!(config.validate().is_err());

        config.max_width = Some(800);
        config.output_path = Some(PathBuf::from("/no/such/directory"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_profile_applies_overrides() {
        let config = Config {
            purpose: "gallery".to_string(),
            quality: Some(0.5),
            max_width: Some(640),
            output_format: Some(OutputFormat::Jpeg),
            ..Default::default()
        };

        let profile = config.effective_profile();
        assert_eq!(profile.max_width, 640);
        // Height override absent: the gallery bound stays.
        assert_eq!(profile.max_height, 2560);
        assert_eq!(profile.quality, 0.5);
        assert_eq!(profile.output_format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_effective_profile_unknown_purpose() {
        let config = Config {
            purpose: "bannner".to_string(),
            ..Default::default()
        };
        assert_eq!(config.effective_profile(), resolve_profile("news"));
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            purpose: "institution".to_string(),
            quality: Some(0.75),
            max_width: Some(1024),
            max_height: Some(768),
            output_format: Some(OutputFormat::Webp),
            output_path: None,
            json_output: true,
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.purpose, "institution");
        assert_eq!(loaded_config.quality, Some(0.75));
        assert_eq!(loaded_config.max_width, Some(1024));
        assert_eq!(loaded_config.max_height, Some(768));
        assert_eq!(loaded_config.output_format, Some(OutputFormat::Webp));
        assert!(loaded_config.json_output);
    }

    #[tokio::test]
    async fn test_config_from_missing_file_is_default() {
        let loaded = Config::from_file(&PathBuf::from("/no/such/config.json"))
            .await
            .unwrap();
        assert_eq!(loaded.purpose, "news");
        assert!(loaded.quality.is_none());
    }
}
