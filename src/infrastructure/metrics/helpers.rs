//! Metric recording helpers

use prometheus::{Encoder, TextEncoder};

use super::{
    SNIPPETS_CACHED, SNIPPETS_INSERTED_TOTAL, STORE_ENCODED_LENGTH, STORE_LOADS_TOTAL,
    STORE_RECOVERIES_TOTAL, STORE_SAVES_TOTAL,
};

/// Render all registered metrics in the Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording store metrics
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a load and where its collection came from
    pub fn record_load(source: &str, count: usize) {
        STORE_LOADS_TOTAL.with_label_values(&[source]).inc();
        SNIPPETS_CACHED.set(count as i64);
    }

    /// Record a successful save
    pub fn record_saved(encoded_len: usize, count: usize) {
        STORE_SAVES_TOTAL.with_label_values(&["ok"]).inc();
        STORE_ENCODED_LENGTH.observe(encoded_len as f64);
        SNIPPETS_CACHED.set(count as i64);
    }

    /// Record a save rejected for size
    pub fn record_oversize(encoded_len: usize) {
        STORE_SAVES_TOTAL.with_label_values(&["oversize"]).inc();
        STORE_ENCODED_LENGTH.observe(encoded_len as f64);
    }

    /// Record a save the host refused
    pub fn record_write_failed() {
        STORE_SAVES_TOTAL.with_label_values(&["failed"]).inc();
    }

    /// Record a corrupt collection being replaced
    pub fn record_recovery() {
        STORE_RECOVERIES_TOTAL.inc();
    }
}

/// Helper struct for recording insertion metrics
pub struct InsertMetrics;

impl InsertMetrics {
    pub fn record_inserted() {
        SNIPPETS_INSERTED_TOTAL.with_label_values(&["ok"]).inc();
    }

    pub fn record_failed() {
        SNIPPETS_INSERTED_TOTAL.with_label_values(&["failed"]).inc();
    }

    pub fn record_no_context() {
        SNIPPETS_INSERTED_TOTAL.with_label_values(&["no_context"]).inc();
    }
}
