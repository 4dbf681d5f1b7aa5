//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shortlink_redirects_total` (counter): dispatcher lookups by `outcome`
//!   (`hit`, `miss`)
//! - `shortlink_mapping_changes_total` (counter): store writes by `change`
//!   (`inserted`, `overwritten`, `removed`)
//! - `shortlink_mappings` (gauge): current number of mappings
//!
//! # Design Decisions
//! - Prometheus endpoint is off by default
//! - Label values are static strings

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one dispatcher lookup.
pub fn record_redirect(outcome: &'static str) {
    metrics::counter!("shortlink_redirects_total", "outcome" => outcome).increment(1);
}

/// Count one store write that changed the table.
pub fn record_mapping_change(change: &'static str) {
    metrics::counter!("shortlink_mapping_changes_total", "change" => change).increment(1);
}

/// Report the current table size.
pub fn record_mapping_count(count: usize) {
    metrics::gauge!("shortlink_mappings").set(count as f64);
}
