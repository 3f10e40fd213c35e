// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::api::ClassifyResponse;
use crate::classifier::WasteClassifier;
use crate::config::ServiceConfig;
use crate::fusion::ClassifyMode;

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Image file to classify
    pub path: PathBuf,

    /// Object detector endpoint; omit to use heuristics only
    #[arg(long, env = "DETECTOR_URL")]
    pub detector_url: Option<String>,

    /// fused or direct
    #[arg(long, env = "CLASSIFY_MODE", default_value = "fused")]
    pub mode: ClassifyMode,

    /// TOML file with color signatures
    #[arg(long, env = "COLOR_SIGNATURES_PATH")]
    pub colors: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

impl ClassifyArgs {
    /// Environment defaults overridden by the command line
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            detector_url: self.detector_url.clone(),
            classify_mode: self.mode,
            color_signatures_path: self.colors.clone(),
            result_cache_size: 0,
            ..ServiceConfig::from_env()
        }
    }
}

pub async fn classify_file(args: ClassifyArgs) -> Result<()> {
    let config = args.service_config();
    let classifier = WasteClassifier::from_config(&config)?;

    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    info!("Classifying {} ({} bytes)", args.path.display(), bytes.len());

    let classification = classifier
        .classify_bytes(&bytes)
        .await
        .with_context(|| format!("Failed to classify {}", args.path.display()))?;
    let response = ClassifyResponse::new(classification, classifier.mode());

    let output = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{}", output);
    Ok(())
}
