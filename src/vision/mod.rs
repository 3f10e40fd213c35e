// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image-side processing: decoding, box geometry and heuristic region detectors
//!
//! Everything here is CPU-only and synchronous; callers move heavy scans
//! onto blocking threads.

pub mod geometry;
pub mod heuristics;
pub mod image_utils;

pub use geometry::{iou, BoundingBox};
pub use heuristics::{ColorDetector, ColorDetectorConfig, RegionDetector, ShapeDetector};
pub use image_utils::{decode_image_bytes, detect_format, to_rgb, ImageError, ImageInfo};
