// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Color-segmentation packaging detector
//!
//! Pixels are converted to HSV (hue 0-180, saturation and value 0-255, the
//! 8-bit OpenCV convention) and tested against a table of named color
//! signatures. The union of all signature masks is traced into external
//! regions; each large enough region is labeled by the first signature,
//! in table order, that covers more than `mask_share` of its area.

use image::{GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{external_contours, RegionDetector};
use crate::detection::{Detection, DetectionSource};
use crate::vision::geometry::{bounding_rect, contour_area, BoundingBox};

/// A named HSV range with the label it produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSignature {
    pub name: String,
    /// Inclusive lower bound `[h, s, v]`
    pub lower: [u8; 3],
    /// Inclusive upper bound `[h, s, v]`
    pub upper: [u8; 3],
    pub label: String,
    pub confidence: f32,
    /// Label used instead when the region is taller than `elongation_ratio` x width
    #[serde(default)]
    pub elongated_label: Option<String>,
    #[serde(default)]
    pub elongated_confidence: Option<f32>,
}

impl ColorSignature {
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lower[i] && hsv[i] <= self.upper[i])
    }
}

fn default_min_area_fraction() -> f64 {
    0.005
}

fn default_mask_share() -> f64 {
    0.2
}

fn default_elongation_ratio() -> f64 {
    1.5
}

fn default_unknown_label() -> String {
    "unknown packaging".to_string()
}

fn default_unknown_confidence() -> f32 {
    0.6
}

/// Tuning for the color detector; loadable from TOML (`[[signature]]` tables)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDetectorConfig {
    /// Signatures in priority order
    #[serde(rename = "signature")]
    pub signatures: Vec<ColorSignature>,
    /// Regions smaller than this fraction of the image are dropped
    #[serde(default = "default_min_area_fraction")]
    pub min_area_fraction: f64,
    /// Share of region area a signature must cover to claim it
    #[serde(default = "default_mask_share")]
    pub mask_share: f64,
    #[serde(default = "default_elongation_ratio")]
    pub elongation_ratio: f64,
    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,
    #[serde(default = "default_unknown_confidence")]
    pub unknown_confidence: f32,
}

impl Default for ColorDetectorConfig {
    fn default() -> Self {
        Self {
            signatures: vec![
                ColorSignature {
                    name: "pink".to_string(),
                    lower: [145, 30, 100],
                    upper: [175, 255, 255],
                    label: "snack package".to_string(),
                    confidence: 0.85,
                    elongated_label: None,
                    elongated_confidence: None,
                },
                ColorSignature {
                    name: "metallic".to_string(),
                    lower: [0, 0, 180],
                    upper: [180, 40, 255],
                    label: "foil packaging".to_string(),
                    confidence: 0.80,
                    elongated_label: None,
                    elongated_confidence: None,
                },
                ColorSignature {
                    name: "clear".to_string(),
                    lower: [0, 0, 160],
                    upper: [180, 30, 255],
                    label: "plastic packaging".to_string(),
                    confidence: 0.75,
                    elongated_label: Some("water bottle".to_string()),
                    elongated_confidence: Some(0.9),
                },
            ],
            min_area_fraction: default_min_area_fraction(),
            mask_share: default_mask_share(),
            elongation_ratio: default_elongation_ratio(),
            unknown_label: default_unknown_label(),
            unknown_confidence: default_unknown_confidence(),
        }
    }
}

impl ColorDetectorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.signatures.is_empty() {
            return Err("at least one color signature is required".to_string());
        }
        for sig in &self.signatures {
            if (0..3).any(|i| sig.lower[i] > sig.upper[i]) {
                return Err(format!("signature '{}' has lower > upper", sig.name));
            }
            let confidences = std::iter::once(sig.confidence).chain(sig.elongated_confidence);
            for c in confidences {
                if !(0.0..=1.0).contains(&c) {
                    return Err(format!("signature '{}' confidence {} out of range", sig.name, c));
                }
            }
        }
        if !(0.0..=1.0).contains(&self.unknown_confidence) {
            return Err("unknown_confidence out of range".to_string());
        }
        Ok(())
    }
}

/// Convert one RGB pixel to 8-bit HSV (hue halved into 0-180)
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };
    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    [
        (h / 2.0).round().min(180.0) as u8,
        s.round().min(255.0) as u8,
        v as u8,
    ]
}

/// Packaging detector over configurable color signatures
#[derive(Debug, Clone, Default)]
pub struct ColorDetector {
    config: ColorDetectorConfig,
}

impl ColorDetector {
    pub fn new(config: ColorDetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ColorDetectorConfig {
        &self.config
    }

    /// One binary mask per signature, in signature order
    fn signature_masks(&self, image: &RgbImage) -> Vec<GrayImage> {
        let (width, height) = image.dimensions();
        let mut masks = vec![GrayImage::new(width, height); self.config.signatures.len()];
        for (x, y, pixel) in image.enumerate_pixels() {
            let hsv = rgb_to_hsv(pixel.0);
            for (mask, sig) in masks.iter_mut().zip(&self.config.signatures) {
                if sig.contains(hsv) {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        masks
    }

    fn count_in_rect(mask: &GrayImage, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let mut count = 0;
        for yy in y..y + h {
            for xx in x..x + w {
                if mask.get_pixel(xx, yy)[0] > 0 {
                    count += 1;
                }
            }
        }
        count
    }

    fn classify_region(
        &self,
        masks: &[GrayImage],
        rect: (u32, u32, u32, u32),
        area: f64,
    ) -> (String, f32) {
        let (x, y, w, h) = rect;
        let claimed = self
            .config
            .signatures
            .iter()
            .zip(masks)
            .find(|(_, mask)| Self::count_in_rect(mask, x, y, w, h) as f64 > area * self.config.mask_share);

        match claimed {
            Some((sig, _)) => {
                let elongated = h as f64 > w as f64 * self.config.elongation_ratio;
                match (&sig.elongated_label, sig.elongated_confidence) {
                    (Some(label), Some(confidence)) if elongated => (label.clone(), confidence),
                    _ => (sig.label.clone(), sig.confidence),
                }
            }
            None => (
                self.config.unknown_label.clone(),
                self.config.unknown_confidence,
            ),
        }
    }
}

impl RegionDetector for ColorDetector {
    fn name(&self) -> &'static str {
        "color"
    }

    fn source(&self) -> DetectionSource {
        DetectionSource::ColorHeuristic
    }

    fn detect(&self, image: &RgbImage) -> Vec<Detection> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || self.config.signatures.is_empty() {
            return Vec::new();
        }

        let masks = self.signature_masks(image);
        let mut union = GrayImage::new(width, height);
        for mask in &masks {
            for (dst, src) in union.pixels_mut().zip(mask.pixels()) {
                dst[0] |= src[0];
            }
        }

        let min_area = width as f64 * height as f64 * self.config.min_area_fraction;
        let mut detections = Vec::new();

        for contour in external_contours(&union) {
            let area = contour_area(&contour);
            if area < min_area {
                continue;
            }
            let Some(rect) = bounding_rect(&contour) else {
                continue;
            };

            let (label, confidence) = self.classify_region(&masks, rect, area);
            let (x, y, w, h) = rect;
            detections.push(Detection::new(
                label,
                confidence,
                BoundingBox::from_rect(x, y, w, h),
                DetectionSource::ColorHeuristic,
            ));
        }

        debug!("Color detector found {} regions", detections.len());
        detections
    }
}
