// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Direct assembly: every source concatenated without overlap suppression
//!
//! This path bypasses `FusionPipeline`, so it can come back empty; the
//! caller then applies the request-tier fallback.

use super::{bottle_shape_record, AcceptedDetection, DetectionSources, FusionConfig};
use crate::taxonomy::{DisposalRecord, TaxonomyMapper};

fn unknown_primary_record() -> DisposalRecord {
    DisposalRecord::new("Trash", "Black Bin", "When in doubt, throw it out")
}

fn unknown_color_record() -> DisposalRecord {
    DisposalRecord::new("Recyclable", "Blue Bin", "Check for recycling symbol")
}

/// Concatenate primary, color and shape detections in that order
pub fn assemble_direct(
    sources: &DetectionSources,
    mapper: &TaxonomyMapper,
    config: &FusionConfig,
) -> Vec<AcceptedDetection> {
    let mut accepted = Vec::new();

    for det in sources.primary.iter().filter(|d| d.is_well_formed()) {
        if config.direct_excluded_labels.contains(&det.label.trim().to_lowercase()) {
            continue;
        }
        accepted.push(AcceptedDetection {
            detection: det.clone(),
            record: mapper
                .resolve_exact(&det.label)
                .unwrap_or_else(unknown_primary_record),
        });
    }

    for det in sources.color.iter().filter(|d| d.is_well_formed()) {
        accepted.push(AcceptedDetection {
            detection: det.clone(),
            record: mapper
                .resolve_exact(&det.label)
                .unwrap_or_else(unknown_color_record),
        });
    }

    for det in sources.shape.iter().filter(|d| d.is_well_formed()) {
        accepted.push(AcceptedDetection {
            detection: det.clone(),
            record: bottle_shape_record(),
        });
    }

    accepted
}
