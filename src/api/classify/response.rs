// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response body for POST /classify

use serde::{Deserialize, Serialize};

use crate::classifier::Classification;
use crate::fusion::{ClassifyMode, FusedDetection};

/// Classification response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifyResponse {
    /// Never empty
    pub detections: Vec<FusedDetection>,
    pub count: usize,
    pub processing_time_ms: u64,
    pub mode: ClassifyMode,
    /// Served from the result memo
    #[serde(default)]
    pub cached: bool,
}

impl ClassifyResponse {
    pub fn new(classification: Classification, mode: ClassifyMode) -> Self {
        Self {
            count: classification.result.count,
            detections: classification.result.detections,
            processing_time_ms: classification.processing_time_ms,
            mode,
            cached: classification.cached,
        }
    }
}
