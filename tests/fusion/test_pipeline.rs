// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Fusion pipeline behaviour through the public API

use std::collections::HashSet;
use waste_sorter::{
    fusion::{assemble, DetectionSources, FusionConfig, FusionPipeline},
    taxonomy::TaxonomyMapper,
    vision::BoundingBox,
    Detection, DetectionSource,
};

fn primary(label: &str, confidence: f32, bbox: [f32; 4]) -> Detection {
    Detection::new(label, confidence, BoundingBox::from(bbox), DetectionSource::Primary)
}

fn color(label: &str, confidence: f32, bbox: [f32; 4]) -> Detection {
    Detection::new(
        label,
        confidence,
        BoundingBox::from(bbox),
        DetectionSource::ColorHeuristic,
    )
}

fn shape(bbox: [f32; 4]) -> Detection {
    Detection::new(
        "water bottle",
        0.8,
        BoundingBox::from(bbox),
        DetectionSource::ShapeHeuristic,
    )
}

#[test]
fn test_overlapping_color_candidate_is_suppressed() {
    let pipeline = FusionPipeline::default();
    let sources = DetectionSources {
        primary: vec![primary("bottle", 0.9, [10.0, 10.0, 50.0, 100.0])],
        color: vec![color("water bottle", 0.9, [12.0, 12.0, 48.0, 98.0])],
        ..Default::default()
    };

    let outcome = pipeline.fuse(&sources);
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.suppressed, 1);
    assert_eq!(outcome.accepted[0].detection.source, DetectionSource::Primary);
    assert_eq!(outcome.accepted[0].record.tip, "Empty and rinse before recycling");
}

#[test]
fn test_disjoint_color_candidate_is_kept() {
    let pipeline = FusionPipeline::default();
    let sources = DetectionSources {
        primary: vec![primary("bottle", 0.9, [10.0, 10.0, 50.0, 100.0])],
        color: vec![color("snack package", 0.85, [200.0, 200.0, 260.0, 240.0])],
        ..Default::default()
    };

    let outcome = pipeline.fuse(&sources);
    assert_eq!(outcome.accepted.len(), 2);
    assert_eq!(outcome.accepted[1].detection.label, "snack package");
    assert_eq!(outcome.accepted[1].record.bin, "Black Bin");
}

#[test]
fn test_output_order_is_primary_color_shape() {
    let pipeline = FusionPipeline::default();
    let sources = DetectionSources {
        primary: vec![primary("wrapper", 0.7, [0.0, 0.0, 20.0, 20.0])],
        color: vec![color("foil packaging", 0.8, [100.0, 100.0, 140.0, 140.0])],
        shape: vec![shape([0.0, 0.0, 20.0, 60.0])],
    };

    let outcome = pipeline.fuse(&sources);
    let order: Vec<DetectionSource> = outcome
        .accepted
        .iter()
        .map(|a| a.detection.source)
        .collect();
    assert_eq!(
        order,
        vec![
            DetectionSource::Primary,
            DetectionSource::ColorHeuristic,
            DetectionSource::ShapeHeuristic
        ]
    );
}

#[test]
fn test_shape_candidates_bypass_suppression() {
    let pipeline = FusionPipeline::default();
    let bbox = [10.0, 10.0, 50.0, 100.0];
    let sources = DetectionSources {
        primary: vec![primary("bottle", 0.9, bbox)],
        shape: vec![shape(bbox), shape(bbox)],
        ..Default::default()
    };

    let outcome = pipeline.fuse(&sources);
    assert_eq!(outcome.accepted.len(), 3);
    assert_eq!(outcome.suppressed, 0);
}

#[test]
fn test_person_never_reaches_output() {
    let pipeline = FusionPipeline::default();
    let sources = DetectionSources {
        primary: vec![
            primary("person", 0.99, [0.0, 0.0, 100.0, 200.0]),
            primary("dog", 0.8, [100.0, 0.0, 150.0, 50.0]),
            primary("bottle", 0.7, [10.0, 150.0, 30.0, 190.0]),
        ],
        ..Default::default()
    };

    let result = assemble(pipeline.fuse(&sources).accepted);
    assert_eq!(result.count, 1);
    assert_eq!(result.detections[0].object_name, "bottle");
}

#[test]
fn test_overlap_threshold_is_configurable() {
    let config = FusionConfig {
        overlap_threshold: 0.95,
        ..FusionConfig::default()
    };
    let pipeline = FusionPipeline::new(config, TaxonomyMapper::default());
    let sources = DetectionSources {
        primary: vec![primary("bottle", 0.9, [10.0, 10.0, 50.0, 100.0])],
        color: vec![color("water bottle", 0.9, [12.0, 12.0, 48.0, 98.0])],
        ..Default::default()
    };

    // IoU is about 0.86, below the raised threshold
    assert_eq!(pipeline.fuse(&sources).accepted.len(), 2);
}

#[test]
fn test_ids_unique_and_count_matches() {
    let pipeline = FusionPipeline::default();
    let sources = DetectionSources {
        primary: vec![
            primary("bottle", 0.9, [0.0, 0.0, 10.0, 40.0]),
            primary("bottle", 0.8, [100.0, 0.0, 110.0, 40.0]),
        ],
        shape: vec![shape([0.0, 0.0, 10.0, 40.0]), shape([100.0, 0.0, 110.0, 40.0])],
        ..Default::default()
    };

    let result = assemble(pipeline.fuse(&sources).accepted);
    assert_eq!(result.count, result.detections.len());
    let ids: HashSet<&str> = result.detections.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_fusion_is_deterministic() {
    let pipeline = FusionPipeline::default();
    let sources = DetectionSources {
        primary: vec![primary("chips bag", 0.6, [0.0, 0.0, 30.0, 30.0])],
        color: vec![
            color("snack package", 0.85, [1.0, 1.0, 30.0, 30.0]),
            color("unknown packaging", 0.6, [60.0, 60.0, 90.0, 90.0]),
        ],
        shape: vec![shape([60.0, 0.0, 70.0, 50.0])],
    };

    let first = assemble(pipeline.fuse(&sources).accepted);
    let second = assemble(pipeline.fuse(&sources).accepted);
    assert_eq!(first, second);
}
