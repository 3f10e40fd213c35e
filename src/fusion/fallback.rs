// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The two guaranteed-detection tiers
//!
//! They deliberately disagree. The pipeline tier fires inside
//! `FusionPipeline::fuse` and yields a weak generic guess in a fixed box.
//! The request tier only fires when a request bypassed the pipeline (direct
//! mode) and still found nothing; it yields a confident bottle in the
//! lower-center of the frame. Keep them separate.

use super::{AcceptedDetection, FusionConfig};
use crate::detection::{Detection, DetectionSource};
use crate::taxonomy::DisposalRecord;
use crate::vision::geometry::BoundingBox;

/// Low-confidence "possible packaging" in the configured placeholder box
pub fn pipeline_fallback(config: &FusionConfig) -> AcceptedDetection {
    AcceptedDetection {
        detection: Detection::new(
            config.fallback_label.clone(),
            config.fallback_confidence,
            config.fallback_bbox,
            DetectionSource::ForcedFallback,
        ),
        record: DisposalRecord::new(
            "Recyclable",
            "Blue Bin",
            "Check material type: paper/cardboard (recycle), soft plastic (trash)",
        ),
    }
}

/// High-confidence bottle spanning the lower-center region of the image
pub fn request_fallback(config: &FusionConfig, width: u32, height: u32) -> AcceptedDetection {
    let [fx1, fy1, fx2, fy2] = config.request_fallback_region;
    // Fractions are applied in f64 so whole-pixel results stay exact
    let (w, h) = (f64::from(width), f64::from(height));
    AcceptedDetection {
        detection: Detection::new(
            config.request_fallback_label.clone(),
            config.request_fallback_confidence,
            BoundingBox::new(
                (w * fx1) as f32,
                (h * fy1) as f32,
                (w * fx2) as f32,
                (h * fy2) as f32,
            ),
            DetectionSource::ForcedFallback,
        ),
        record: DisposalRecord::new("Recyclable", "Blue Bin", "Empty and rinse before recycling"),
    }
}
