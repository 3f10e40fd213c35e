// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::{env, path::PathBuf};
use waste_sorter::{
    api::start_server,
    config::{ServiceConfig, DEFAULT_LISTEN_ADDR},
    fusion::ClassifyMode,
    vision::image_utils::MAX_IMAGE_SIZE,
};

/// Waste sorting classification server
#[derive(Parser, Debug)]
#[command(name = "waste-sorter", version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    listen_addr: String,

    /// Object detector sidecar endpoint; heuristics only when unset
    #[arg(long, env = "DETECTOR_URL")]
    detector_url: Option<String>,

    #[arg(long, env = "DETECTOR_TIMEOUT_SECS", default_value_t = 30)]
    detector_timeout_secs: u64,

    /// Primary detections below this confidence are ignored
    #[arg(long, env = "PRIMARY_MIN_CONFIDENCE", default_value_t = 0.15)]
    primary_min_confidence: f32,

    /// fused or direct
    #[arg(long, env = "CLASSIFY_MODE", default_value = "fused")]
    classify_mode: ClassifyMode,

    /// Result memo capacity, 0 disables it
    #[arg(long, env = "RESULT_CACHE_SIZE", default_value_t = 0)]
    result_cache_size: usize,

    /// TOML file with color signatures
    #[arg(long, env = "COLOR_SIGNATURES_PATH")]
    color_signatures_path: Option<PathBuf>,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = MAX_IMAGE_SIZE)]
    max_upload_bytes: usize,
}

impl From<Args> for ServiceConfig {
    fn from(args: Args) -> Self {
        ServiceConfig {
            listen_addr: args.listen_addr,
            detector_url: args.detector_url.filter(|url| !url.trim().is_empty()),
            detector_timeout_secs: args.detector_timeout_secs,
            primary_min_confidence: args.primary_min_confidence,
            classify_mode: args.classify_mode,
            result_cache_size: args.result_cache_size,
            color_signatures_path: args.color_signatures_path,
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::from(Args::parse());
    config.validate()?;

    tracing::info!(
        "Starting waste sorter {} (detector: {})",
        env!("CARGO_PKG_VERSION"),
        config.detector_url.as_deref().unwrap_or("disabled")
    );

    start_server(config).await
}
