// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::fusion::NON_WASTE_OBJECTS;
use crate::taxonomy::{DisposalRecord, TaxonomyMapper};

/// Arguments for the lookup command
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Object label, e.g. "chips bag"
    pub label: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LookupResult {
    pub label: String,
    /// Labels the fusion pipeline always discards
    pub excluded: bool,
    pub record: Option<DisposalRecord>,
}

pub fn resolve_label(mapper: &TaxonomyMapper, label: &str) -> LookupResult {
    let normalized = label.trim().to_lowercase();
    LookupResult {
        excluded: NON_WASTE_OBJECTS.contains(&normalized.as_str()),
        record: mapper.resolve(&normalized),
        label: normalized,
    }
}

pub fn lookup_label(args: LookupArgs) -> Result<()> {
    let result = resolve_label(&TaxonomyMapper::default(), &args.label);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
