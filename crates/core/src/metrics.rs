//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog view derivation (filter, sort, group)
//! - Preference and metadata loads
//! - Catalog export

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Derivation Metrics
// =============================================================================

/// Catalog view derivations computed (cache misses).
pub static DERIVATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pickbook_derivations_total",
        "Total catalog view derivations computed",
    )
    .unwrap()
});

/// Time spent filtering, sorting and grouping one view.
pub static DERIVATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pickbook_derivation_duration_seconds",
            "Duration of a catalog view derivation",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0]),
        &[],
    )
    .unwrap()
});

/// Items seen by a derivation, before ("input") and after ("filtered") matching.
pub static DERIVATION_ITEMS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pickbook_derivation_items",
            "Number of items per derivation stage",
        )
        .buckets(vec![0.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0]),
        &["stage"], // "input", "filtered"
    )
    .unwrap()
});

// =============================================================================
// Load Metrics
// =============================================================================

/// Preference fetches by result.
pub static PREFERENCE_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pickbook_preference_loads_total", "Total preference fetches"),
        &["result"], // "found", "absent", "error", "anonymous"
    )
    .unwrap()
});

/// Metadata fetches by result.
pub static METADATA_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pickbook_metadata_loads_total", "Total metadata fetches"),
        &["result"], // "success", "error"
    )
    .unwrap()
});

/// Load completions discarded because a newer load superseded them.
pub static STALE_LOADS_DISCARDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pickbook_stale_loads_discarded_total",
        "Total load completions discarded as stale",
    )
    .unwrap()
});

/// Filter updates dropped while a load was in flight.
pub static UPDATES_DROPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pickbook_filter_updates_dropped_total",
        "Total filter updates dropped during a load",
    )
    .unwrap()
});

// =============================================================================
// Export Metrics
// =============================================================================

/// Catalog exports by result.
pub static EXPORTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pickbook_exports_total", "Total catalog exports"),
        &["result"], // "success", "invalid"
    )
    .unwrap()
});

/// Rows per successful export.
pub static EXPORT_ROWS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("pickbook_export_rows", "Number of rows per catalog export")
            .buckets(vec![0.0, 10.0, 100.0, 500.0, 1000.0, 5000.0, 20000.0]),
        &[],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Derivation
        Box::new(DERIVATIONS_TOTAL.clone()),
        Box::new(DERIVATION_DURATION.clone()),
        Box::new(DERIVATION_ITEMS.clone()),
        // Loads
        Box::new(PREFERENCE_LOADS.clone()),
        Box::new(METADATA_LOADS.clone()),
        Box::new(STALE_LOADS_DISCARDED.clone()),
        Box::new(UPDATES_DROPPED.clone()),
        // Export
        Box::new(EXPORTS_TOTAL.clone()),
        Box::new(EXPORT_ROWS.clone()),
    ]
}
