// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Mapping of free-text object labels to disposal guidance
//!
//! Resolution is an ordered list of rules, first match wins:
//! 1. packaging override (`box`, `carton`, `packag*`)
//! 2. the authored `TaxonomyTable`, substring keys in table order
//! 3. ambiguous containers (`backpack`, `handbag`, `suitcase`)
//!
//! Anything else is a `None` (no match); callers decide what to do with it.

pub mod rules;

use serde::{Deserialize, Serialize};

pub use rules::{AnyFragment, LabelPredicate, OneOf, Rule, Substring};

/// Disposal category, bin and handling tip for one kind of item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalRecord {
    pub category: String,
    pub bin: String,
    pub tip: String,
}

impl DisposalRecord {
    pub fn new(category: &str, bin: &str, tip: &str) -> Self {
        Self {
            category: category.to_string(),
            bin: bin.to_string(),
            tip: tip.to_string(),
        }
    }
}

/// Ordered `label substring -> record` table
///
/// Key order is load-bearing: lookups take the first key contained in the label.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyTable {
    entries: Vec<(String, DisposalRecord)>,
}

impl TaxonomyTable {
    pub fn new(entries: Vec<(String, DisposalRecord)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, DisposalRecord)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&DisposalRecord> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, record)| record)
    }
}

impl Default for TaxonomyTable {
    fn default() -> Self {
        let entry = |key: &str, category: &str, bin: &str, tip: &str| {
            (key.to_string(), DisposalRecord::new(category, bin, tip))
        };
        Self::new(vec![
            // Packaging
            entry("plastic bag", "Recyclable", "Blue Bin", "Check for recycling symbol"),
            entry("wrapper", "Trash", "Black Bin", "Most wrappers go in general trash"),
            entry("snack package", "Trash", "Black Bin", "Check for recycling symbol"),
            entry("foil packaging", "Recyclable", "Blue Bin", "Clean before recycling"),
            entry("chips bag", "Trash", "Black Bin", "Most chip bags are not recyclable"),
            entry("candy wrapper", "Trash", "Black Bin", "Not recyclable"),
            entry(
                "unknown packaging",
                "Possibly Recyclable",
                "Check Material",
                "Look for recycling symbol",
            ),
            // Bottles and containers
            entry("bottle", "Recyclable", "Blue Bin", "Empty and rinse before recycling"),
            entry("water bottle", "Recyclable", "Blue Bin", "Remove cap and recycle separately"),
            entry("plastic bottle", "Recyclable", "Blue Bin", "Check recycling number"),
            entry("drinks container", "Recyclable", "Blue Bin", "Rinse before recycling"),
        ])
    }
}

/// Fragments that mark a label as cardboard or packaging
pub const PACKAGING_FRAGMENTS: &[&str] = &["box", "carton", "packag"];

/// Objects that may be waste but whose material is unclear
pub const AMBIGUOUS_CONTAINERS: &[&str] = &["backpack", "handbag", "suitcase"];

pub fn packaging_record() -> DisposalRecord {
    DisposalRecord::new(
        "Recyclable",
        "Blue Bin",
        "Flatten cardboard, remove plastic film",
    )
}

pub fn check_materials_record() -> DisposalRecord {
    DisposalRecord::new(
        "Check Materials",
        "Various",
        "Separate plastic, fabric, and metal components",
    )
}

/// Resolves labels against the ordered rule list
#[derive(Debug)]
pub struct TaxonomyMapper {
    rules: Vec<Rule>,
    table: TaxonomyTable,
}

impl TaxonomyMapper {
    pub fn new(table: TaxonomyTable) -> Self {
        let mut rules = Vec::with_capacity(table.entries().len() + 2);
        rules.push(Rule::new(
            AnyFragment(PACKAGING_FRAGMENTS.iter().map(|s| s.to_string()).collect()),
            packaging_record(),
        ));
        for (key, record) in table.entries() {
            rules.push(Rule::new(Substring(key.clone()), record.clone()));
        }
        rules.push(Rule::new(
            OneOf::new(AMBIGUOUS_CONTAINERS.iter().copied()),
            check_materials_record(),
        ));
        Self { rules, table }
    }

    /// Full rule-chain resolution; `None` means no match
    ///
    /// The returned record is a copy, the table is never touched.
    pub fn resolve(&self, label: &str) -> Option<DisposalRecord> {
        let label = label.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&label))
            .map(|rule| rule.record.clone())
    }

    /// Table entry whose key equals the label exactly
    pub fn resolve_exact(&self, label: &str) -> Option<DisposalRecord> {
        let label = label.trim().to_lowercase();
        self.table.get(&label).cloned()
    }

    pub fn table(&self) -> &TaxonomyTable {
        &self.table
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for TaxonomyMapper {
    fn default() -> Self {
        Self::new(TaxonomyTable::default())
    }
}
