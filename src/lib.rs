// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cache;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod detection;
pub mod detector;
pub mod fusion;
pub mod taxonomy;
pub mod vision;

pub use classifier::{Classification, ClassifyError, WasteClassifier};
pub use config::ServiceConfig;
pub use detection::{Detection, DetectionSource, RawDetection};
pub use detector::{DetectorError, PrimaryDetector};
pub use fusion::{ClassificationResult, ClassifyMode, FusedDetection, FusionPipeline};
pub use taxonomy::{DisposalRecord, TaxonomyMapper};
