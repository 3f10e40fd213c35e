// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Flattening accepted detections into the response list

use serde::{Deserialize, Serialize};

use super::AcceptedDetection;
use crate::detection::DetectionSource;
use crate::vision::geometry::BoundingBox;

/// One entry of the classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedDetection {
    /// Unique within one response
    pub id: String,
    pub object_name: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub category: String,
    pub bin: String,
    #[serde(rename = "tips")]
    pub tip: String,
    #[serde(rename = "detection_type")]
    pub source: DetectionSource,
}

/// Ordered detections plus their count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub detections: Vec<FusedDetection>,
    pub count: usize,
}

/// Id from the label and its position, e.g. `snack_package_1`
fn detection_id(label: &str, ordinal: usize) -> String {
    let slug: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        format!("object_{}", ordinal)
    } else {
        format!("{}_{}", slug, ordinal)
    }
}

/// Build the response list, keeping acceptance order
pub fn assemble(accepted: Vec<AcceptedDetection>) -> ClassificationResult {
    let detections: Vec<FusedDetection> = accepted
        .into_iter()
        .enumerate()
        .map(|(ordinal, AcceptedDetection { detection, record })| FusedDetection {
            id: detection_id(&detection.label, ordinal),
            object_name: detection.label,
            bbox: detection.bbox,
            confidence: detection.confidence,
            category: record.category,
            bin: record.bin,
            tip: record.tip,
            source: detection.source,
        })
        .collect();

    ClassificationResult {
        count: detections.len(),
        detections,
    }
}
