//! Lookup metrics.
//!
//! Every `Lookup` instance owns its own counters, so segment loads and disk
//! reads can be observed per instance.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one lookup instance.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Number of times a segment was loaded from disk
    segment_loads: AtomicUsize,

    /// Number of lang files read (up to two per segment load)
    files_read: AtomicUsize,

    /// Number of lookups answered from an already loaded segment
    cache_hits: AtomicUsize,

    /// Number of lookups whose key was absent from the segment
    missing_keys: AtomicUsize,
}

impl LookupMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a segment load.
    pub fn record_segment_load(&self) {
        self.segment_loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one lang file read.
    pub fn record_file_read(&self) {
        self.files_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup served from the loaded texts.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that fell back to the default or the selector.
    pub fn record_missing_key(&self) {
        self.missing_keys.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current segment load count.
    pub fn segment_loads(&self) -> usize {
        self.segment_loads.load(Ordering::Relaxed)
    }

    /// Get the current lang file read count.
    pub fn files_read(&self) -> usize {
        self.files_read.load(Ordering::Relaxed)
    }

    /// Get the current cache hit count.
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Get the current missing key count.
    pub fn missing_keys(&self) -> usize {
        self.missing_keys.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let loads = self.segment_loads();
        let hits = self.cache_hits();
        let total_lookups = hits + loads;
        let cache_hit_rate = if total_lookups > 0 {
            (hits as f64 / total_lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            segment_loads: loads,
            files_read: self.files_read(),
            cache_hits: hits,
            cache_hit_rate,
            missing_keys: self.missing_keys(),
        }
    }
}

/// Snapshot of a lookup instance's counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of segment loads
    pub segment_loads: usize,

    /// Number of lang files read
    pub files_read: usize,

    /// Number of lookups served from loaded texts
    pub cache_hits: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    /// Number of lookups that fell back to a default or the selector
    pub missing_keys: usize,
}
