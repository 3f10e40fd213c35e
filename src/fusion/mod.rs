// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multi-source detection fusion
//!
//! Reconciles primary detector output with the color and shape heuristics
//! in a single ordered pass:
//!
//! 1. primary detections seed the accepted set (non-waste labels excluded);
//!    every seeded box is tracked for overlap checks
//! 2. primary labels without a taxonomy match are dropped
//! 3. color candidates overlapping a tracked box above the threshold are
//!    dropped as duplicates, the rest are accepted and tracked
//! 4. shape candidates are appended unconditionally
//! 5. an empty result becomes a single low-confidence fallback
//!
//! Order matters for step 3, so sources are always consumed as
//! primary, then color, then shape.

pub mod assemble;
pub mod direct;
pub mod fallback;

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detection::Detection;
use crate::taxonomy::{DisposalRecord, TaxonomyMapper};
use crate::vision::geometry::{iou, BoundingBox};

pub use assemble::{assemble, ClassificationResult, FusedDetection};
pub use direct::assemble_direct;
pub use fallback::{pipeline_fallback, request_fallback};

/// Objects the primary detector knows that are never waste
pub const NON_WASTE_OBJECTS: &[&str] = &[
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
];

/// Labels skipped by the direct (pipeline-bypassing) assembly
pub const DIRECT_EXCLUDED_OBJECTS: &[&str] = &["person", "car", "truck"];

/// Record for accepted color candidates without an exact taxonomy entry
pub fn generic_color_record() -> DisposalRecord {
    DisposalRecord::new(
        "Recyclable",
        "Blue Bin",
        "Check material type before recycling",
    )
}

/// Record attached to every shape candidate
pub fn bottle_shape_record() -> DisposalRecord {
    DisposalRecord::new(
        "Recyclable",
        "Blue Bin",
        "Empty, rinse, and remove cap before recycling",
    )
}

/// How a request turns detector output into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifyMode {
    /// Overlap-aware fusion pipeline with its own fallback
    #[default]
    Fused,
    /// Plain concatenation of all sources, bypassing the pipeline
    Direct,
}

impl FromStr for ClassifyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fused" => Ok(ClassifyMode::Fused),
            "direct" => Ok(ClassifyMode::Direct),
            other => Err(format!("unknown classify mode '{}', expected fused or direct", other)),
        }
    }
}

/// Tunables for fusion and both fallback tiers
#[derive(Debug, Clone, PartialEq)]
pub struct FusionConfig {
    /// Color candidates above this IoU with a tracked box are duplicates
    pub overlap_threshold: f32,
    /// Primary detections below this confidence are ignored
    pub primary_min_confidence: f32,
    pub excluded_labels: HashSet<String>,
    pub direct_excluded_labels: HashSet<String>,
    pub fallback_label: String,
    pub fallback_confidence: f32,
    pub fallback_bbox: BoundingBox,
    pub request_fallback_label: String,
    pub request_fallback_confidence: f32,
    /// `[x1, y1, x2, y2]` as fractions of image width/height
    pub request_fallback_region: [f64; 4],
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.3,
            primary_min_confidence: 0.15,
            excluded_labels: NON_WASTE_OBJECTS.iter().map(|s| s.to_string()).collect(),
            direct_excluded_labels: DIRECT_EXCLUDED_OBJECTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback_label: "possible packaging".to_string(),
            fallback_confidence: 0.3,
            fallback_bbox: BoundingBox::new(50.0, 50.0, 150.0, 150.0),
            request_fallback_label: "water bottle".to_string(),
            request_fallback_confidence: 0.9,
            request_fallback_region: [0.2, 0.6, 0.8, 0.95],
        }
    }
}

/// Per-source detections for one image, each list in its natural order
#[derive(Debug, Clone, Default)]
pub struct DetectionSources {
    pub primary: Vec<Detection>,
    pub color: Vec<Detection>,
    pub shape: Vec<Detection>,
}

impl DetectionSources {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.color.is_empty() && self.shape.is_empty()
    }
}

/// A detection with its resolved disposal guidance
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedDetection {
    pub detection: Detection,
    pub record: DisposalRecord,
}

/// What one fusion pass did
#[derive(Debug, Clone, Default)]
pub struct FusionOutcome {
    /// Never empty
    pub accepted: Vec<AcceptedDetection>,
    pub excluded: usize,
    pub unmatched: usize,
    pub suppressed: usize,
    pub malformed: usize,
    pub fallback_used: bool,
}

/// Reusable fusion pipeline; holds no per-request state
#[derive(Debug, Default)]
pub struct FusionPipeline {
    config: FusionConfig,
    mapper: TaxonomyMapper,
}

impl FusionPipeline {
    pub fn new(config: FusionConfig, mapper: TaxonomyMapper) -> Self {
        Self { config, mapper }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn mapper(&self) -> &TaxonomyMapper {
        &self.mapper
    }

    /// Run one fusion pass. Never fails and never returns an empty set.
    pub fn fuse(&self, sources: &DetectionSources) -> FusionOutcome {
        let mut outcome = FusionOutcome::default();
        let mut tracked: Vec<BoundingBox> = Vec::new();

        for det in &sources.primary {
            if !det.is_well_formed() {
                outcome.malformed += 1;
                continue;
            }
            let label = det.label.trim().to_lowercase();
            // Exclusion wins over any taxonomy match
            if self.config.excluded_labels.contains(&label) {
                outcome.excluded += 1;
                continue;
            }
            if det.confidence < self.config.primary_min_confidence {
                continue;
            }

            tracked.push(det.bbox);

            match self.mapper.resolve(&label) {
                Some(record) => outcome.accepted.push(AcceptedDetection {
                    detection: Detection { label, ..det.clone() },
                    record,
                }),
                None => {
                    debug!("No taxonomy match for primary label '{}'", label);
                    outcome.unmatched += 1;
                }
            }
        }

        for det in &sources.color {
            if !det.is_well_formed() {
                outcome.malformed += 1;
                continue;
            }
            let duplicate = tracked
                .iter()
                .any(|existing| iou(&det.bbox, existing) > self.config.overlap_threshold);
            if duplicate {
                outcome.suppressed += 1;
                continue;
            }

            let record = self
                .mapper
                .resolve_exact(&det.label)
                .unwrap_or_else(generic_color_record);
            tracked.push(det.bbox);
            outcome.accepted.push(AcceptedDetection {
                detection: det.clone(),
                record,
            });
        }

        for det in &sources.shape {
            if !det.is_well_formed() {
                outcome.malformed += 1;
                continue;
            }
            outcome.accepted.push(AcceptedDetection {
                detection: det.clone(),
                record: bottle_shape_record(),
            });
        }

        if outcome.accepted.is_empty() {
            outcome.accepted.push(pipeline_fallback(&self.config));
            outcome.fallback_used = true;
        }

        outcome
    }
}
