// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use image::{DynamicImage, Rgb, RgbImage};
use waste_sorter::vision::heuristics::{
    ColorDetector, ColorDetectorConfig, ColorSignature, RegionDetector, ShapeDetector,
};
use waste_sorter::DetectionSource;

fn fill(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: [u8; 3]) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}

#[test]
fn test_two_separate_packages() {
    let mut img = RgbImage::new(200, 100);
    fill(&mut img, 10, 10, 40, 40, [220, 40, 160]);
    fill(&mut img, 120, 20, 50, 30, [175, 175, 175]);

    let detections = ColorDetector::default().detect(&img);
    assert_eq!(detections.len(), 2);

    let mut labels: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
    labels.sort_unstable();
    assert_eq!(labels, vec!["plastic packaging", "snack package"]);
    assert!(detections
        .iter()
        .all(|d| d.source == DetectionSource::ColorHeuristic));
}

#[test]
fn test_custom_signature_table() {
    let config = ColorDetectorConfig {
        signatures: vec![ColorSignature {
            name: "green".to_string(),
            lower: [35, 50, 50],
            upper: [85, 255, 255],
            label: "glass bottle".to_string(),
            confidence: 0.7,
            elongated_label: None,
            elongated_confidence: None,
        }],
        ..ColorDetectorConfig::default()
    };
    let mut img = RgbImage::new(100, 100);
    fill(&mut img, 20, 20, 30, 30, [30, 200, 40]);
    // Pink is not part of this table
    fill(&mut img, 60, 60, 30, 30, [220, 40, 160]);

    let detections = ColorDetector::new(config).detect(&img);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].label, "glass bottle");
    assert_eq!(detections[0].bbox.to_array(), [20.0, 20.0, 50.0, 50.0]);
}

#[test]
fn test_detect_dynamic_handles_grayscale() {
    let mut img = RgbImage::new(100, 100);
    fill(&mut img, 40, 20, 20, 60, [255, 255, 255]);
    let gray = DynamicImage::ImageRgb8(img).to_luma8();

    let detections = ShapeDetector::default().detect_dynamic(&DynamicImage::ImageLuma8(gray));
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].source, DetectionSource::ShapeHeuristic);
}

#[test]
fn test_heuristics_ignore_noise_free_background() {
    let img = RgbImage::from_pixel(64, 64, Rgb([20, 20, 20]));
    assert!(ColorDetector::default().detect(&img).is_empty());
    assert!(ShapeDetector::default().detect(&img).is_empty());
}
