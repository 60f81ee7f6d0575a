//! Metrics collection and exposition.
//!
//! # Metrics
//! - `faucet_http_requests_total` (counter): requests by endpoint, outcome
//! - `faucet_disbursements_total` (counter): approved transfers by chain
//! - `faucet_disbursed_amount_total` (counter): base units sent by chain
//! - `faucet_rejections_total` (counter): policy rejections by chain, reason
//! - `faucet_rollbacks_total` (counter): admissions undone after a failed transfer
//! - `faucet_day_tally` (gauge): current daily tally by chain
//! - `faucet_node_call_duration_seconds` (histogram): node binary latency by command
//!
//! Without an installed exporter every call is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: &'static str, outcome: &'static str) {
    counter!("faucet_http_requests_total", "endpoint" => endpoint, "outcome" => outcome).increment(1);
}

pub fn record_disbursement(chain: &str, amount: u64) {
    counter!("faucet_disbursements_total", "chain" => chain.to_string()).increment(1);
    counter!("faucet_disbursed_amount_total", "chain" => chain.to_string()).increment(amount);
}

pub fn record_rejection(chain: &str, reason: &'static str) {
    counter!("faucet_rejections_total", "chain" => chain.to_string(), "reason" => reason).increment(1);
}

pub fn record_rollback(chain: &str) {
    counter!("faucet_rollbacks_total", "chain" => chain.to_string()).increment(1);
}

pub fn record_day_tally(chain: &str, tally: u64) {
    gauge!("faucet_day_tally", "chain" => chain.to_string()).set(tally as f64);
}

pub fn record_node_call(command: &'static str, success: bool, start: Instant) {
    let outcome = if success { "ok" } else { "error" };
    histogram!("faucet_node_call_duration_seconds", "command" => command, "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
