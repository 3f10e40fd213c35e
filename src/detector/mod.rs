// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Primary (general-purpose) object detector interface
//!
//! The detector itself is an external service; this module only defines
//! the contract and ships an HTTP sidecar client plus a disabled stand-in.

pub mod http;

use async_trait::async_trait;
use image::RgbImage;
use thiserror::Error;

use crate::detection::RawDetection;
use crate::vision::ImageError;

pub use http::HttpObjectDetector;

/// Failures of a primary detector call
#[derive(Debug, Error)]
pub enum DetectorError {
    /// No detector is configured or it is switched off
    #[error("Detector unavailable: {detector}")]
    Unavailable { detector: String },

    #[error("Detector request failed: {0}")]
    Request(String),

    #[error("Detector API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid detector response: {0}")]
    InvalidResponse(String),

    #[error("Failed to prepare image: {0}")]
    Image(#[from] ImageError),
}

/// A pretrained object detector producing labeled, scored boxes
///
/// Labels come from an open vocabulary; callers must tolerate unseen ones.
#[async_trait]
pub trait PrimaryDetector: Send + Sync {
    /// Run detection once on an RGB image
    async fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>, DetectorError>;

    /// Detector name for logging
    fn name(&self) -> &str;

    /// Whether the detector is configured at all
    fn is_available(&self) -> bool {
        true
    }

    /// Liveness probe for the health endpoint
    async fn health_check(&self) -> bool {
        self.is_available()
    }
}

/// Stand-in used when no detector endpoint is configured
///
/// Every call fails with `Unavailable`, so classification runs on
/// heuristics alone.
#[derive(Debug, Clone, Default)]
pub struct DisabledDetector;

#[async_trait]
impl PrimaryDetector for DisabledDetector {
    async fn detect(&self, _image: &RgbImage) -> Result<Vec<RawDetection>, DetectorError> {
        Err(DetectorError::Unavailable {
            detector: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "disabled"
    }

    fn is_available(&self) -> bool {
        false
    }
}
