use std::time::Duration;

use metrics::{counter, histogram};
use tracing::{info, warn};

use crate::api::{BackendError, SubmissionResult};

use super::metrics::prometheus_enabled;

pub fn consolidation_started(sources: usize, percentage: f64) {
    info!(
        target: "monitoring::consolidation",
        event = "started",
        sources,
        percentage,
        "consolidation started"
    );

    if prometheus_enabled() {
        counter!("sweeper_consolidation_started_total").increment(1);
        histogram!("sweeper_consolidation_sources").record(sources as f64);
    }
}

pub fn transactions_prepared(transactions: usize, batches: usize) {
    info!(
        target: "monitoring::consolidation",
        event = "prepared",
        transactions,
        batches,
        "transactions signed and batched"
    );

    if prometheus_enabled() {
        histogram!("sweeper_prepared_transactions").record(transactions as f64);
    }
}

pub fn batch_submitted(
    batch: usize,
    transactions: usize,
    result: &SubmissionResult,
    elapsed: Duration,
) {
    let status = if result.is_accepted() {
        "accepted"
    } else {
        "rejected"
    };
    info!(
        target: "monitoring::consolidation",
        event = "batch_submitted",
        batch,
        transactions,
        status,
        elapsed_ms = elapsed.as_micros() as f64 / 1_000.0,
        "batch submission finished"
    );

    if prometheus_enabled() {
        counter!("sweeper_batches_total", "status" => status).increment(1);
        counter!("sweeper_transactions_submitted_total", "status" => status)
            .increment(transactions as u64);
        histogram!("sweeper_batch_submit_latency_ms").record(elapsed.as_secs_f64() * 1_000.0);
    }
}

pub fn batch_failed(batch: usize, transactions: usize, error: &BackendError) {
    warn!(
        target: "monitoring::consolidation",
        event = "batch_failed",
        batch,
        transactions,
        error = %error,
        "batch submission failed"
    );

    if prometheus_enabled() {
        counter!("sweeper_batches_total", "status" => "failed").increment(1);
    }
}

pub fn consolidation_finished(batches: usize, accepted: usize, elapsed: Duration) {
    info!(
        target: "monitoring::consolidation",
        event = "finished",
        batches,
        accepted,
        elapsed_ms = elapsed.as_millis() as u64,
        "consolidation finished"
    );

    if prometheus_enabled() {
        counter!("sweeper_consolidation_total", "result" => "success").increment(1);
    }
}

pub fn consolidation_failed(stage: &'static str, message: &str) {
    warn!(
        target: "monitoring::consolidation",
        event = "failed",
        stage,
        error = message,
        "consolidation failed"
    );

    if prometheus_enabled() {
        counter!("sweeper_consolidation_total", "result" => "failure", "stage" => stage)
            .increment(1);
    }
}
