// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection records shared by every detector and the fusion pipeline

use serde::{Deserialize, Serialize};

use crate::vision::geometry::BoundingBox;

/// Where a detection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionSource {
    /// External general-purpose object detector
    #[serde(rename = "primary")]
    Primary,
    /// Color-segmentation packaging detector
    #[serde(rename = "color")]
    ColorHeuristic,
    /// Edge/shape bottle detector
    #[serde(rename = "shape")]
    ShapeHeuristic,
    /// Synthesised when nothing else was found
    #[serde(rename = "forced")]
    ForcedFallback,
}

impl DetectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionSource::Primary => "primary",
            DetectionSource::ColorHeuristic => "color",
            DetectionSource::ShapeHeuristic => "shape",
            DetectionSource::ForcedFallback => "forced",
        }
    }
}

/// A labeled, scored box produced by one detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Free-text label, not a closed vocabulary
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
    pub source: DetectionSource,
}

impl Detection {
    pub fn new(
        label: impl Into<String>,
        confidence: f32,
        bbox: BoundingBox,
        source: DetectionSource,
    ) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
            source,
        }
    }

    /// Confidence within [0, 1] and a non-degenerate box
    pub fn is_well_formed(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence) && self.bbox.is_valid()
    }
}

/// One record of primary detector output
///
/// Accepts both `label` and the YOLO-style `name` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(alias = "name", alias = "class")]
    pub label: String,
    pub confidence: f32,
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl RawDetection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: [f32; 4]) -> Self {
        Self {
            label: label.into(),
            confidence,
            xmin: bbox[0],
            ymin: bbox[1],
            xmax: bbox[2],
            ymax: bbox[3],
        }
    }

    /// Normalise into a `Detection` tagged as primary, lower-casing the label
    pub fn into_detection(self) -> Detection {
        Detection {
            label: self.label.trim().to_lowercase(),
            confidence: self.confidence,
            bbox: BoundingBox::new(self.xmin, self.ymin, self.xmax, self.ymax),
            source: DetectionSource::Primary,
        }
    }
}
