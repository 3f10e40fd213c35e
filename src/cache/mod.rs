// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification result memo keyed by upload content
//!
//! Identical bytes always produce the same fused result, so repeat uploads
//! can skip the detectors entirely. Disabled when capacity is zero.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::fusion::ClassificationResult;

/// Hex SHA-256 of the raw upload
pub fn content_key(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

struct Inner {
    entries: LruCache<String, ClassificationResult>,
    hits: u64,
    misses: u64,
}

/// Bounded LRU of classification results
pub struct ResultCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl ResultCache {
    /// Returns `None` for a zero capacity
    pub fn new(capacity: usize) -> Option<Self> {
        let cap = NonZeroUsize::new(capacity)?;
        Some(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(cap),
                hits: 0,
                misses: 0,
            }),
            capacity,
        })
    }

    pub fn get(&self, key: &str) -> Option<ClassificationResult> {
        let mut inner = self.inner.lock().ok()?;
        let found = inner.entries.get(key).cloned();
        match found {
            Some(result) => {
                inner.hits += 1;
                Some(result)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    pub fn insert(&self, key: String, result: ClassificationResult) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.entries.put(key, result);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        match self.inner.lock() {
            Ok(inner) => CacheStats {
                entries: inner.entries.len(),
                capacity: self.capacity,
                hits: inner.hits,
                misses: inner.misses,
            },
            Err(_) => CacheStats {
                entries: 0,
                capacity: self.capacity,
                hits: 0,
                misses: 0,
            },
        }
    }
}
