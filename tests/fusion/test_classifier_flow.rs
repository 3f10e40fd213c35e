// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end classification with stub primary detectors and synthetic photos

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use std::sync::Arc;
use waste_sorter::{
    detector::DisabledDetector, ClassifyMode, DetectionSource, DetectorError, PrimaryDetector,
    RawDetection, WasteClassifier,
};

/// Returns a fixed set of records for every image
struct StubDetector {
    records: Vec<RawDetection>,
}

#[async_trait]
impl PrimaryDetector for StubDetector {
    async fn detect(&self, _image: &RgbImage) -> Result<Vec<RawDetection>, DetectorError> {
        Ok(self.records.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Always times out
struct TimeoutDetector;

#[async_trait]
impl PrimaryDetector for TimeoutDetector {
    async fn detect(&self, _image: &RgbImage) -> Result<Vec<RawDetection>, DetectorError> {
        Err(DetectorError::Request("operation timed out".to_string()))
    }

    fn name(&self) -> &str {
        "timeout"
    }
}

fn fill(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: [u8; 3]) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}

#[tokio::test]
async fn test_blank_photo_fused_gets_pipeline_fallback() {
    let classifier = WasteClassifier::new(Arc::new(DisabledDetector));
    let result = classifier.classify_image(RgbImage::new(120, 120)).await.unwrap();

    assert_eq!(result.count, 1);
    assert_eq!(result.detections[0].confidence, 0.3);
    assert_eq!(result.detections[0].source, DetectionSource::ForcedFallback);
}

#[tokio::test]
async fn test_blank_photo_direct_gets_request_fallback() {
    let classifier =
        WasteClassifier::new(Arc::new(DisabledDetector)).with_mode(ClassifyMode::Direct);
    let result = classifier.classify_image(RgbImage::new(100, 100)).await.unwrap();

    assert_eq!(result.count, 1);
    assert_eq!(result.detections[0].object_name, "water bottle");
    assert_eq!(result.detections[0].confidence, 0.9);
    assert_eq!(result.detections[0].bbox.to_array(), [20.0, 60.0, 80.0, 95.0]);
}

#[tokio::test]
async fn test_detector_failure_falls_back_to_heuristics() {
    let mut img = RgbImage::new(100, 100);
    fill(&mut img, 30, 30, 40, 40, [220, 40, 160]);

    let classifier = WasteClassifier::new(Arc::new(TimeoutDetector));
    let result = classifier.classify_image(img).await.unwrap();

    let color_hits: Vec<_> = result
        .detections
        .iter()
        .filter(|d| d.source == DetectionSource::ColorHeuristic)
        .collect();
    assert_eq!(color_hits.len(), 1);
    assert_eq!(color_hits[0].object_name, "snack package");
    assert_eq!(color_hits[0].category, "Trash");
}

#[tokio::test]
async fn test_primary_box_suppresses_matching_color_region() {
    let mut img = RgbImage::new(100, 100);
    fill(&mut img, 30, 30, 40, 40, [220, 40, 160]);

    let detector = StubDetector {
        records: vec![RawDetection::new("chips bag", 0.7, [29.0, 29.0, 71.0, 71.0])],
    };
    let classifier = WasteClassifier::new(Arc::new(detector));
    let result = classifier.classify_image(img).await.unwrap();

    assert!(result
        .detections
        .iter()
        .all(|d| d.source != DetectionSource::ColorHeuristic));
    assert_eq!(result.detections[0].object_name, "chips bag");
}

#[tokio::test]
async fn test_excluded_and_low_confidence_primary_dropped() {
    let detector = StubDetector {
        records: vec![
            RawDetection::new("person", 0.99, [0.0, 0.0, 60.0, 100.0]),
            RawDetection::new("bottle", 0.05, [10.0, 10.0, 30.0, 60.0]),
            RawDetection::new("Water Bottle", 0.6, [40.0, 10.0, 60.0, 60.0]),
        ],
    };
    let classifier = WasteClassifier::new(Arc::new(detector));
    let result = classifier.classify_image(RgbImage::new(100, 100)).await.unwrap();

    assert_eq!(result.count, 1);
    assert_eq!(result.detections[0].object_name, "water bottle");
    assert_eq!(result.detections[0].source, DetectionSource::Primary);
}

#[tokio::test]
async fn test_gray_bottle_found_by_both_heuristics() {
    let mut img = RgbImage::new(100, 100);
    fill(&mut img, 40, 20, 20, 60, [170, 170, 170]);

    let classifier = WasteClassifier::new(Arc::new(DisabledDetector));
    let result = classifier.classify_image(img).await.unwrap();

    assert!(result.detections.iter().any(|d| {
        d.source == DetectionSource::ColorHeuristic && d.object_name == "water bottle"
    }));
    assert!(result
        .detections
        .iter()
        .any(|d| d.source == DetectionSource::ShapeHeuristic));
    assert!(result
        .detections
        .iter()
        .all(|d| d.source != DetectionSource::ForcedFallback));
}
