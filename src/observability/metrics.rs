//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by endpoint and outcome
//! - `gateway_request_duration_seconds` (histogram): latency by endpoint
//! - `gateway_node_calls_total` (counter): node RPC calls by method and outcome
//! - `gateway_scan_blocks_total` (counter): blocks fetched by recent-transaction scans
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Record one handled HTTP request.
pub fn record_request(endpoint: &'static str, ok: bool, start: Instant) {
    ::metrics::counter!("gateway_requests_total", "endpoint" => endpoint, "outcome" => outcome(ok))
        .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record one node RPC call.
pub fn record_node_call(method: &'static str, ok: bool) {
    ::metrics::counter!("gateway_node_calls_total", "method" => method, "outcome" => outcome(ok))
        .increment(1);
}

/// Record one block fetched by a recent-transaction scan.
pub fn record_scanned_block() {
    ::metrics::counter!("gateway_scan_blocks_total").increment(1);
}
