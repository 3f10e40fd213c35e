// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! The pipeline-tier and request-tier fallbacks stay distinct

use waste_sorter::{
    fusion::{
        assemble, assemble_direct, pipeline_fallback, request_fallback, DetectionSources,
        FusionConfig, FusionPipeline,
    },
    taxonomy::TaxonomyMapper,
    vision::BoundingBox,
    Detection, DetectionSource,
};

#[test]
fn test_empty_fused_result_is_low_confidence_packaging() {
    let result = assemble(FusionPipeline::default().fuse(&DetectionSources::default()).accepted);

    assert_eq!(result.count, 1);
    let only = &result.detections[0];
    assert_eq!(only.object_name, "possible packaging");
    assert_eq!(only.confidence, 0.3);
    assert_eq!(only.bbox.to_array(), [50.0, 50.0, 150.0, 150.0]);
    assert_eq!(only.source, DetectionSource::ForcedFallback);
    assert_eq!(
        only.tip,
        "Check material type: paper/cardboard (recycle), soft plastic (trash)"
    );
}

#[test]
fn test_only_excluded_objects_still_yields_fallback() {
    let sources = DetectionSources {
        primary: vec![Detection::new(
            "car",
            0.95,
            BoundingBox::new(0.0, 0.0, 300.0, 200.0),
            DetectionSource::Primary,
        )],
        ..Default::default()
    };
    let outcome = FusionPipeline::default().fuse(&sources);
    assert!(outcome.fallback_used);
    assert_eq!(outcome.accepted[0].detection.confidence, 0.3);
}

#[test]
fn test_direct_mode_empty_then_request_fallback() {
    let config = FusionConfig::default();
    let accepted = assemble_direct(
        &DetectionSources::default(),
        &TaxonomyMapper::default(),
        &config,
    );
    assert!(accepted.is_empty());

    let fallback = request_fallback(&config, 640, 480);
    assert_eq!(fallback.detection.label, "water bottle");
    assert_eq!(fallback.detection.confidence, 0.9);
    assert_eq!(
        fallback.detection.bbox.to_array(),
        [128.0, 288.0, 512.0, 456.0]
    );
    assert_eq!(fallback.record.tip, "Empty and rinse before recycling");
}

#[test]
fn test_tiers_are_not_interchangeable() {
    let config = FusionConfig::default();
    let pipeline_tier = pipeline_fallback(&config);
    let request_tier = request_fallback(&config, 200, 200);
    assert!(pipeline_tier.detection.confidence < request_tier.detection.confidence);
    assert_ne!(pipeline_tier.record, request_tier.record);
}

#[test]
fn test_direct_mode_concatenates_without_suppression() {
    let bbox = BoundingBox::new(10.0, 10.0, 50.0, 100.0);
    let sources = DetectionSources {
        primary: vec![
            Detection::new("truck", 0.9, bbox, DetectionSource::Primary),
            Detection::new("bicycle", 0.9, bbox, DetectionSource::Primary),
        ],
        color: vec![Detection::new("clear wrap", 0.75, bbox, DetectionSource::ColorHeuristic)],
        shape: vec![Detection::new("water bottle", 0.8, bbox, DetectionSource::ShapeHeuristic)],
    };
    let accepted = assemble_direct(&sources, &TaxonomyMapper::default(), &FusionConfig::default());

    let labels: Vec<&str> = accepted.iter().map(|a| a.detection.label.as_str()).collect();
    assert_eq!(labels, vec!["bicycle", "clear wrap", "water bottle"]);
    assert_eq!(accepted[0].record.tip, "When in doubt, throw it out");
    assert_eq!(accepted[1].record.tip, "Check for recycling symbol");
    assert_eq!(
        accepted[2].record.tip,
        "Empty, rinse, and remove cap before recycling"
    );
}
