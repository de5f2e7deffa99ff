// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Per-year memo of solar-term tables.
//!
//! Reads share a read lock and bump an atomic recency stamp. A miss computes
//! outside any lock and then inserts under the write lock, evicting the least
//! recently used year when full. Two threads missing the same year may both
//! compute it; the tables are identical, so whichever insert lands last wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::ChartError;
use crate::solar_terms::YearTerms;

/// Hit/miss counters and occupancy of a [`SolarTermCache`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

#[derive(Debug)]
struct Entry {
    terms: Arc<YearTerms>,
    last_used: AtomicU64,
}

/// Bounded LRU cache of [`YearTerms`] keyed by solar year.
#[derive(Debug)]
pub struct SolarTermCache {
    entries: RwLock<HashMap<i32, Entry>>,
    capacity: usize,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SolarTermCache {
    /// A cache holding at most `capacity` years (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            capacity,
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[inline]
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Cached table for `year`, if present.
    pub fn get(&self, year: i32) -> Option<Arc<YearTerms>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&year)?;
        entry.last_used.store(self.tick(), Ordering::Relaxed);
        Some(Arc::clone(&entry.terms))
    }

    /// Store `terms` under its year, evicting the stalest year when full.
    pub fn insert(&self, terms: YearTerms) -> Arc<YearTerms> {
        let year = terms.year();
        let terms = Arc::new(terms);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if !entries.contains_key(&year) && entries.len() >= self.capacity {
            let stalest = entries
                .iter()
                .min_by_key(|(_, e)| e.last_used.load(Ordering::Relaxed))
                .map(|(&y, _)| y);
            if let Some(evicted) = stalest {
                entries.remove(&evicted);
                debug!(evicted, inserted = year, "solar-term cache eviction");
            }
        }

        entries.insert(
            year,
            Entry {
                terms: Arc::clone(&terms),
                last_used: AtomicU64::new(self.tick()),
            },
        );
        terms
    }

    /// Cached table for `year`, computing it with `compute` on a miss.
    ///
    /// Errors from `compute` are returned as-is and nothing is cached.
    pub fn get_or_try_insert_with<F>(&self, year: i32, compute: F) -> Result<Arc<YearTerms>, ChartError>
    where
        F: FnOnce() -> Result<YearTerms, ChartError>,
    {
        if let Some(terms) = self.get(year) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(terms);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(year, "solar-term cache miss");
        let terms = compute()?;
        Ok(self.insert(terms))
    }

    pub fn contains(&self, year: i32) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&year)
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity,
        }
    }
}

impl Default for SolarTermCache {
    fn default() -> Self {
        Self::new(32)
    }
}
