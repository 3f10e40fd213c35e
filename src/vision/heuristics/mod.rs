// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rule-based region detectors that supplement the primary detector
//!
//! - `color` - packaging found by hue/saturation/value signatures
//! - `shape` - bottle-like silhouettes found from edges
//!
//! Both are stateless and only read the image they are given.

pub mod color;
pub mod shape;

use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::detection::{Detection, DetectionSource};
use crate::vision::image_utils::to_rgb;

pub use color::{ColorDetector, ColorDetectorConfig, ColorSignature};
pub use shape::{ShapeDetector, ShapeDetectorConfig};

/// A scanner that proposes labeled regions from pixels alone
pub trait RegionDetector: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Source tag carried by every detection this scanner emits
    fn source(&self) -> DetectionSource;

    /// Scan an RGB image, returning candidates in scan order
    fn detect(&self, image: &RgbImage) -> Vec<Detection>;

    /// Scan an image of any channel layout
    fn detect_dynamic(&self, image: &DynamicImage) -> Vec<Detection> {
        self.detect(&to_rgb(image))
    }
}

/// Outermost contours of the non-zero regions of a binary mask
///
/// Holes and contours nested inside other regions are skipped.
pub(crate) fn external_contours(mask: &GrayImage) -> Vec<Vec<Point<u32>>> {
    find_contours::<u32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points)
        .collect()
}
