// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request orchestration
//!
//! Decodes an upload, runs the primary detector and both heuristic scanners
//! concurrently, then hands their output to fusion in the fixed
//! primary, color, shape order. A failing primary detector degrades to an
//! empty source. Once the image decodes, only a crashed heuristic task fails
//! the request.

use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::cache::{content_key, CacheStats, ResultCache};
use crate::config::{ConfigError, ServiceConfig};
use crate::detection::Detection;
use crate::detector::{DisabledDetector, HttpObjectDetector, PrimaryDetector};
use crate::fusion::{
    assemble, assemble_direct, request_fallback, ClassificationResult, ClassifyMode,
    DetectionSources, FusionPipeline,
};
use crate::taxonomy::TaxonomyMapper;
use crate::vision::heuristics::{
    ColorDetector, ColorDetectorConfig, RegionDetector, ShapeDetector, ShapeDetectorConfig,
};
use crate::vision::image_utils::{decode_image_bytes_with_limit, to_rgb, ImageError, MAX_IMAGE_SIZE};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("{detector} detector task failed: {message}")]
    DetectorTask {
        detector: &'static str,
        message: String,
    },
}

/// Result of one classification request
#[derive(Debug, Clone)]
pub struct Classification {
    pub result: ClassificationResult,
    pub processing_time_ms: u64,
    /// Served from the result memo
    pub cached: bool,
}

/// Primary detector status for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct DetectorStatus {
    pub name: String,
    pub configured: bool,
    pub reachable: bool,
}

/// Classifies waste photos; shared across requests behind an `Arc`
pub struct WasteClassifier {
    detector: Arc<dyn PrimaryDetector>,
    color: Arc<ColorDetector>,
    shape: Arc<ShapeDetector>,
    pipeline: FusionPipeline,
    mode: ClassifyMode,
    cache: Option<ResultCache>,
    max_upload_bytes: usize,
}

impl WasteClassifier {
    /// Classifier with default heuristics, fusion and no memo
    pub fn new(detector: Arc<dyn PrimaryDetector>) -> Self {
        Self {
            detector,
            color: Arc::new(ColorDetector::new(ColorDetectorConfig::default())),
            shape: Arc::new(ShapeDetector::new(ShapeDetectorConfig::default())),
            pipeline: FusionPipeline::default(),
            mode: ClassifyMode::default(),
            cache: None,
            max_upload_bytes: MAX_IMAGE_SIZE,
        }
    }

    /// Build everything a server needs from the service configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let detector: Arc<dyn PrimaryDetector> = match &config.detector_url {
            Some(url) => Arc::new(
                HttpObjectDetector::new(url, config.detector_timeout())
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?,
            ),
            None => {
                warn!("DETECTOR_URL not set, classifying with heuristics only");
                Arc::new(DisabledDetector)
            }
        };

        let classifier = Self::new(detector)
            .with_color_config(config.color_config()?)
            .with_pipeline(FusionPipeline::new(
                config.fusion_config(),
                TaxonomyMapper::default(),
            ))
            .with_mode(config.classify_mode)
            .with_cache(config.result_cache_size)
            .with_max_upload_bytes(config.max_upload_bytes);

        Ok(classifier)
    }

    pub fn with_mode(mut self, mode: ClassifyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_pipeline(mut self, pipeline: FusionPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_color_config(mut self, config: ColorDetectorConfig) -> Self {
        self.color = Arc::new(ColorDetector::new(config));
        self
    }

    pub fn with_shape_config(mut self, config: ShapeDetectorConfig) -> Self {
        self.shape = Arc::new(ShapeDetector::new(config));
        self
    }

    /// Zero disables the memo
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = ResultCache::new(capacity);
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn mode(&self) -> ClassifyMode {
        self.mode
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn pipeline(&self) -> &FusionPipeline {
        &self.pipeline
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ResultCache::stats)
    }

    pub async fn detector_status(&self) -> DetectorStatus {
        let configured = self.detector.is_available();
        let reachable = configured && self.detector.health_check().await;
        DetectorStatus {
            name: self.detector.name().to_string(),
            configured,
            reachable,
        }
    }

    /// Classify an uploaded image file
    pub async fn classify_bytes(&self, bytes: &[u8]) -> Result<Classification, ClassifyError> {
        let start = Instant::now();

        let key = self.cache.as_ref().map(|_| content_key(bytes));
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(result) = cache.get(key) {
                debug!("Result cache hit for {}", &key[..12]);
                return Ok(Classification {
                    result,
                    processing_time_ms: start.elapsed().as_millis() as u64,
                    cached: true,
                });
            }
        }

        let (image, info) = decode_image_bytes_with_limit(bytes, self.max_upload_bytes)?;
        debug!(
            "Decoded {:?} image {}x{} ({} bytes)",
            info.format, info.width, info.height, info.size_bytes
        );

        let result = self.classify_image(to_rgb(&image)).await?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, result.clone());
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Classified {}x{} image: {} detections in {}ms",
            info.width, info.height, result.count, processing_time_ms
        );

        Ok(Classification {
            result,
            processing_time_ms,
            cached: false,
        })
    }

    /// Classify an already decoded image. Never returns an empty list.
    pub async fn classify_image(
        &self,
        image: RgbImage,
    ) -> Result<ClassificationResult, ClassifyError> {
        let (width, height) = image.dimensions();
        let sources = self.gather_sources(Arc::new(image)).await?;
        debug!(
            "Sources: primary={} color={} shape={}",
            sources.primary.len(),
            sources.color.len(),
            sources.shape.len()
        );

        let accepted = match self.mode {
            ClassifyMode::Fused => {
                let outcome = self.pipeline.fuse(&sources);
                debug!(
                    "Fusion: excluded={} unmatched={} suppressed={} malformed={}",
                    outcome.excluded, outcome.unmatched, outcome.suppressed, outcome.malformed
                );
                if outcome.fallback_used {
                    info!("No detections survived fusion, using pipeline fallback");
                }
                outcome.accepted
            }
            ClassifyMode::Direct => {
                let mut accepted =
                    assemble_direct(&sources, self.pipeline.mapper(), self.pipeline.config());
                if accepted.is_empty() {
                    info!("No detections found, using request fallback");
                    accepted.push(request_fallback(self.pipeline.config(), width, height));
                }
                accepted
            }
        };

        Ok(assemble(accepted))
    }

    /// Run all three detectors on one image; the heuristics go to blocking threads
    async fn gather_sources(
        &self,
        image: Arc<RgbImage>,
    ) -> Result<DetectionSources, ClassifyError> {
        let color = Arc::clone(&self.color);
        let color_image = Arc::clone(&image);
        let color_task = tokio::task::spawn_blocking(move || color.detect(&color_image));

        let shape = Arc::clone(&self.shape);
        let shape_image = Arc::clone(&image);
        let shape_task = tokio::task::spawn_blocking(move || shape.detect(&shape_image));

        let (primary, color, shape) =
            tokio::join!(self.primary_detections(&image), color_task, shape_task);

        Ok(DetectionSources {
            primary,
            color: heuristic_output("color", color)?,
            shape: heuristic_output("shape", shape)?,
        })
    }

    async fn primary_detections(&self, image: &RgbImage) -> Vec<Detection> {
        if !self.detector.is_available() {
            return Vec::new();
        }
        match self.detector.detect(image).await {
            Ok(records) => records.into_iter().map(|r| r.into_detection()).collect(),
            Err(e) => {
                warn!("Primary detector '{}' failed: {}", self.detector.name(), e);
                Vec::new()
            }
        }
    }
}

/// Unwrap a blocking heuristic task; a panic inside it is an internal failure
fn heuristic_output(
    detector: &'static str,
    joined: Result<Vec<Detection>, JoinError>,
) -> Result<Vec<Detection>, ClassifyError> {
    joined.map_err(|e| {
        error!("{} detector task failed: {}", detector, e);
        ClassifyError::DetectorTask {
            detector,
            message: e.to_string(),
        }
    })
}
