// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Edge/shape detector for bottle-like silhouettes

use image::imageops::grayscale;
use image::RgbImage;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{external_contours, RegionDetector};
use crate::detection::{Detection, DetectionSource};
use crate::vision::geometry::{bounding_rect, BoundingBox};

/// Tuning for the shape detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDetectorConfig {
    /// Gaussian sigma (1.1 matches a 5x5 kernel)
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Chebyshev dilation radius; 2 equals two passes of a 3x3 kernel
    pub dilate_radius: u8,
    /// Height/width ratio above which a region looks bottle-like
    pub min_aspect_ratio: f32,
    /// Box area fraction above which a region qualifies regardless of aspect
    pub min_area_fraction: f32,
    /// Minimum height as a fraction of image height
    pub min_height_fraction: f32,
    pub label: String,
    pub confidence: f32,
}

impl Default for ShapeDetectorConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            dilate_radius: 2,
            min_aspect_ratio: 1.5,
            min_area_fraction: 0.02,
            min_height_fraction: 0.2,
            label: "water bottle".to_string(),
            confidence: 0.8,
        }
    }
}

/// Finds tall or large edge-bounded regions and reports them as bottles
#[derive(Debug, Clone, Default)]
pub struct ShapeDetector {
    config: ShapeDetectorConfig,
}

impl ShapeDetector {
    pub fn new(config: ShapeDetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShapeDetectorConfig {
        &self.config
    }

    /// Bottle test on an `(x, y, w, h)` rectangle inside a `width` x `height` image
    pub fn qualifies(&self, rect: (u32, u32, u32, u32), width: u32, height: u32) -> bool {
        let (_, _, w, h) = rect;
        let aspect_ratio = if w > 0 { h as f32 / w as f32 } else { 0.0 };
        let area = w as f32 * h as f32;
        let min_area = width as f32 * height as f32 * self.config.min_area_fraction;

        (aspect_ratio > self.config.min_aspect_ratio || area > min_area)
            && h as f32 > height as f32 * self.config.min_height_fraction
    }
}

impl RegionDetector for ShapeDetector {
    fn name(&self) -> &'static str {
        "shape"
    }

    fn source(&self) -> DetectionSource {
        DetectionSource::ShapeHeuristic
    }

    fn detect(&self, image: &RgbImage) -> Vec<Detection> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let gray = grayscale(image);
        let blurred = gaussian_blur_f32(&gray, self.config.blur_sigma);
        let edges = canny(&blurred, self.config.canny_low, self.config.canny_high);
        let dilated = dilate(&edges, Norm::LInf, self.config.dilate_radius);

        let detections: Vec<Detection> = external_contours(&dilated)
            .iter()
            .filter_map(|contour| bounding_rect(contour))
            .filter(|rect| self.qualifies(*rect, width, height))
            .map(|(x, y, w, h)| {
                Detection::new(
                    self.config.label.clone(),
                    self.config.confidence,
                    BoundingBox::from_rect(x, y, w, h),
                    DetectionSource::ShapeHeuristic,
                )
            })
            .collect();

        debug!("Shape detector found {} bottle candidates", detections.len());
        detections
    }
}
