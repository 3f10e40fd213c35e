// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod classify;
pub mod lookup;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Waste sorter CLI
#[derive(Parser, Debug)]
#[command(name = "waste-cli")]
#[command(version)]
#[command(about = "Classify waste photos and query disposal guidance offline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify an image file and print the detections as JSON
    Classify(classify::ClassifyArgs),

    /// Show the disposal guidance a label resolves to
    Lookup(lookup::LookupArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Classify(args) => classify::classify_file(args).await,
        Commands::Lookup(args) => lookup::lookup_label(args),
    }
}
