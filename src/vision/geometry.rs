// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Axis-aligned box geometry and overlap evaluation

use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in image pixel coordinates (origin top-left)
///
/// Serialised as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box from an OpenCV-style `(x, y, w, h)` rectangle
    pub fn from_rect(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::new(
            x as f32,
            y as f32,
            (x + width) as f32,
            (y + height) as f32,
        )
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Area, or 0 for inverted or NaN boxes
    pub fn area(&self) -> f32 {
        let (w, h) = (self.width(), self.height());
        if w > 0.0 && h > 0.0 && (w * h).is_finite() {
            w * h
        } else {
            0.0
        }
    }

    /// True when all coordinates are finite and the box has positive area
    pub fn is_valid(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite())
            && self.x1 < self.x2
            && self.y1 < self.y2
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}

/// Intersection over union of two boxes
///
/// Symmetric in its arguments. Disjoint, degenerate or NaN input yields 0.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    // f32::max/min skip NaN operands, so non-finite edges must be caught first
    if !a.is_valid() || !b.is_valid() {
        return 0.0;
    }

    let left = a.x1.max(b.x1);
    let top = a.y1.max(b.y1);
    let right = a.x2.min(b.x2);
    let bottom = a.y2.min(b.y2);

    if right <= left || bottom <= top {
        return 0.0;
    }

    let intersection = (right - left) * (bottom - top);
    let union = a.area() + b.area() - intersection;

    if union > 0.0 && union.is_finite() {
        (intersection / union).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Integer bounding rectangle `(x, y, w, h)` of a traced contour
///
/// Width and height count pixels, so a single point has size 1x1.
pub fn bounding_rect(points: &[Point<u32>]) -> Option<(u32, u32, u32, u32)> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Polygon area enclosed by a contour (shoelace formula)
pub fn contour_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    twice_area.abs() / 2.0
}
