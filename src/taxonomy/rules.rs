// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label predicates used by taxonomy rules

use std::collections::HashSet;
use std::fmt;

use super::DisposalRecord;

/// Decides whether a (lower-cased) label is covered by a rule
pub trait LabelPredicate: Send + Sync + fmt::Debug {
    fn matches(&self, label: &str) -> bool;
}

/// Label contains the key anywhere
#[derive(Debug, Clone)]
pub struct Substring(pub String);

impl LabelPredicate for Substring {
    fn matches(&self, label: &str) -> bool {
        label.contains(self.0.as_str())
    }
}

/// Label contains at least one of the fragments
#[derive(Debug, Clone)]
pub struct AnyFragment(pub Vec<String>);

impl LabelPredicate for AnyFragment {
    fn matches(&self, label: &str) -> bool {
        self.0.iter().any(|f| label.contains(f.as_str()))
    }
}

/// Label is a member of a fixed set
#[derive(Debug, Clone)]
pub struct OneOf(pub HashSet<String>);

impl OneOf {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }
}

impl LabelPredicate for OneOf {
    fn matches(&self, label: &str) -> bool {
        self.0.contains(label)
    }
}

/// A `(predicate, record)` pair; rules are evaluated in order and the first match wins
#[derive(Debug)]
pub struct Rule {
    pub predicate: Box<dyn LabelPredicate>,
    pub record: DisposalRecord,
}

impl Rule {
    pub fn new(predicate: impl LabelPredicate + 'static, record: DisposalRecord) -> Self {
        Self {
            predicate: Box::new(predicate),
            record,
        }
    }
}
