//! Metrics collection and exposition.
//!
//! # Metrics
//! - `starter_transactions_total` (counter): demo submissions by outcome
//! - `starter_rpc_requests_total` (counter): JSON-RPC calls by method, status
//! - `starter_rpc_duration_seconds` (histogram): JSON-RPC latency by method
//! - `starter_callback_navigations_total` (counter): OAuth callbacks that
//!   reached the home page

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_rpc(method: &'static str, status: &'static str, start: Instant) {
    metrics::counter!(
        "starter_rpc_requests_total",
        "method" => method,
        "status" => status
    )
    .increment(1);
    metrics::histogram!("starter_rpc_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_transaction(outcome: &'static str) {
    metrics::counter!("starter_transactions_total", "outcome" => outcome).increment(1);
}

pub fn record_callback_navigation() {
    metrics::counter!("starter_callback_navigations_total").increment(1);
}
