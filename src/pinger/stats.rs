//! Per-endpoint rolling statistics.

use super::result::PingResult;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative counters for one endpoint, updated lock-free.
#[derive(Debug, Default)]
pub struct EndpointStats {
    total_probes: AtomicU64,
    failed_probes: AtomicU64,
    avg_latency_ms: AtomicU64,
}

/// Point-in-time copy of endpoint stats for display and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointStatsView {
    pub total_probes: u64,
    pub failed_probes: u64,
    pub avg_latency_ms: u64,
}

impl EndpointStats {
    /// Record one probe outcome.
    ///
    /// Latency only enters the rolling average for completed responses;
    /// a timed-out attempt would just smear the timeout into the average.
    pub fn record(&self, result: &PingResult) {
        self.total_probes.fetch_add(1, Ordering::SeqCst);
        if !result.is_up() {
            self.failed_probes.fetch_add(1, Ordering::SeqCst);
        }
        if result.status != 0 {
            self.update_latency(result.response_time_ms);
        }
    }

    /// Update rolling average latency using EMA: new = (sample + 4*old) / 5.
    ///
    /// Uses integer math with α=0.2. First sample sets the initial value.
    fn update_latency(&self, latency_ms: u64) {
        loop {
            let current = self.avg_latency_ms.load(Ordering::SeqCst);

            let new_val = if current == 0 {
                latency_ms
            } else {
                (latency_ms + 4 * current) / 5
            };

            match self.avg_latency_ms.compare_exchange(
                current,
                new_val,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(_) => continue, // Retry if another thread modified the value
            }
        }
    }

    /// Snapshot the counters.
    pub fn snapshot(&self) -> EndpointStatsView {
        EndpointStatsView {
            total_probes: self.total_probes.load(Ordering::SeqCst),
            failed_probes: self.failed_probes.load(Ordering::SeqCst),
            avg_latency_ms: self.avg_latency_ms.load(Ordering::SeqCst),
        }
    }
}
