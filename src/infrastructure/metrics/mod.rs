//! Prometheus metrics for the snippet taskpane.
//!
//! - Store metrics (loads by source, saves by outcome, corruption recoveries)
//! - Snippet metrics (cached collection size, insertions by outcome)

mod helpers;

pub use helpers::{encode_metrics, InsertMetrics, StoreMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "snippets";

lazy_static! {
    // ============================================================================
    // Store Metrics
    // ============================================================================

    /// Collection loads by where the collection came from
    pub static ref STORE_LOADS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_store_loads_total", METRIC_PREFIX),
        "Snippet collection loads by source",
        &["source"]
    ).unwrap();

    /// Collection saves by outcome
    pub static ref STORE_SAVES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_store_saves_total", METRIC_PREFIX),
        "Snippet collection saves by outcome",
        &["outcome"]
    ).unwrap();

    /// Stored collections that failed to parse and were replaced by defaults
    pub static ref STORE_RECOVERIES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_store_recoveries_total", METRIC_PREFIX),
        "Corrupt snippet collections replaced by defaults"
    ).unwrap();

    /// Encoded collection size on save
    pub static ref STORE_ENCODED_LENGTH: Histogram = register_histogram!(
        format!("{}_store_encoded_length", METRIC_PREFIX),
        "Encoded snippet collection length in UTF-16 units",
        vec![1_000.0, 5_000.0, 10_000.0, 20_000.0, 30_000.0]
    ).unwrap();

    // ============================================================================
    // Snippet Metrics
    // ============================================================================

    /// Number of snippets in the current collection
    pub static ref SNIPPETS_CACHED: IntGauge = register_int_gauge!(
        format!("{}_cached", METRIC_PREFIX),
        "Number of snippets in the current collection"
    ).unwrap();

    /// Insertions into the compose body by outcome
    pub static ref SNIPPETS_INSERTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_inserted_total", METRIC_PREFIX),
        "Snippet insertions by outcome",
        &["outcome"]
    ).unwrap();
}
