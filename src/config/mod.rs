// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Everything is read from environment variables with sensible defaults.
//! Color signatures are data and can be swapped out through a TOML file.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::fusion::{ClassifyMode, FusionConfig};
use crate::vision::heuristics::ColorDetectorConfig;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Top-level service settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Object detector sidecar; `None` disables the primary detector
    pub detector_url: Option<String>,
    pub detector_timeout_secs: u64,
    /// Primary detections below this confidence are ignored
    pub primary_min_confidence: f32,
    pub classify_mode: ClassifyMode,
    /// Result memo capacity, 0 disables it
    pub result_cache_size: usize,
    /// TOML file with `[[signature]]` tables
    pub color_signatures_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let classify_mode = match env::var("CLASSIFY_MODE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}; using {:?}", e, defaults.classify_mode);
                defaults.classify_mode
            }),
            Err(_) => defaults.classify_mode,
        };

        Self {
            listen_addr: env_non_empty("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            detector_url: env_non_empty("DETECTOR_URL"),
            detector_timeout_secs: env_parse("DETECTOR_TIMEOUT_SECS")
                .unwrap_or(defaults.detector_timeout_secs),
            primary_min_confidence: env_parse("PRIMARY_MIN_CONFIDENCE")
                .unwrap_or(defaults.primary_min_confidence),
            classify_mode,
            result_cache_size: env_parse("RESULT_CACHE_SIZE")
                .unwrap_or(defaults.result_cache_size),
            color_signatures_path: env_non_empty("COLOR_SIGNATURES_PATH").map(PathBuf::from),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("listen address must not be empty".into()));
        }
        if self.detector_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "detector timeout must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.primary_min_confidence) {
            return Err(ConfigError::Invalid(format!(
                "primary minimum confidence {} is outside [0, 1]",
                self.primary_min_confidence
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("upload limit must be greater than 0".into()));
        }
        if let Some(url) = &self.detector_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "detector url '{}' must start with http:// or https://",
                    url
                )));
            }
        }
        Ok(())
    }

    pub fn detector_timeout(&self) -> Duration {
        Duration::from_secs(self.detector_timeout_secs)
    }

    /// Fusion tunables derived from this configuration
    pub fn fusion_config(&self) -> FusionConfig {
        FusionConfig {
            primary_min_confidence: self.primary_min_confidence,
            ..FusionConfig::default()
        }
    }

    /// Color detector settings from the signatures file, or the built-ins
    pub fn color_config(&self) -> Result<ColorDetectorConfig, ConfigError> {
        match &self.color_signatures_path {
            Some(path) => load_color_signatures(path),
            None => Ok(ColorDetectorConfig::default()),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            detector_url: None,
            detector_timeout_secs: 30,
            primary_min_confidence: 0.15,
            classify_mode: ClassifyMode::Fused,
            result_cache_size: 0,
            color_signatures_path: None,
            max_upload_bytes: MAX_IMAGE_SIZE,
        }
    }
}

/// Parse a color signature table from TOML text
pub fn parse_color_signatures(content: &str) -> Result<ColorDetectorConfig, String> {
    let config: ColorDetectorConfig = toml::from_str(content).map_err(|e| e.to_string())?;
    config.validate()?;
    Ok(config)
}

/// Load a color signature table from a TOML file
pub fn load_color_signatures(path: &Path) -> Result<ColorDetectorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_color_signatures(&content).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
