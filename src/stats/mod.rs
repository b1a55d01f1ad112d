//! Lock-free outcome aggregation for concurrent workers
//!
//! `RequestStats` is the only state shared between workers. Every field is
//! an independent atomic; `record` touches the total, exactly one outcome
//! counter, the latency sum and the running extrema, with no lock spanning
//! fields. Reading is only possible by consuming the aggregator
//! (`RequestStats::finish`), which the scenario runner can do only once every
//! worker has released its handle at the join barrier.

use crate::models::{OutcomeKind, RequestOutcome};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};


/// Concurrency-safe counter set shared by all workers of one scenario
#[derive(Debug)]
pub struct RequestStats {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
    latency_sum_ms: AtomicU64,
    min_latency_ms: AtomicU64,
    max_latency_ms: AtomicU64,
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStats {
    /// Fresh aggregator. Minimum starts at `u64::MAX` so the first sample
    /// always replaces it; maximum starts at zero.
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            successful: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            timed_out: AtomicU64::new(0),
            latency_sum_ms: AtomicU64::new(0),
            min_latency_ms: AtomicU64::new(u64::MAX),
            max_latency_ms: AtomicU64::new(0),
        }
    }

    /// Record one request. Safe to call from any number of workers at once.
    pub fn record(&self, success: bool, latency_ms: u64, timed_out: bool) {
        self.record_outcome(&RequestOutcome {
            success,
            latency_ms,
            timed_out,
        });
    }

    /// Record one classified outcome
    pub fn record_outcome(&self, outcome: &RequestOutcome) {
        self.total.fetch_add(1, Ordering::Relaxed);
        match outcome.kind() {
            OutcomeKind::TimedOut => self.timed_out.fetch_add(1, Ordering::Relaxed),
            OutcomeKind::Success => self.successful.fetch_add(1, Ordering::Relaxed),
            OutcomeKind::Failed => self.failed.fetch_add(1, Ordering::Relaxed),
        };
        self.latency_sum_ms.fetch_add(outcome.latency_ms, Ordering::Relaxed);

        Self::update_min(&self.min_latency_ms, outcome.latency_ms);
        Self::update_max(&self.max_latency_ms, outcome.latency_ms);
    }

    // Compare-and-retry: give up as soon as the stored value is already at
    // least as extreme, otherwise retry against whatever a racer wrote.
    fn update_min(slot: &AtomicU64, latency_ms: u64) {
        let mut current = slot.load(Ordering::Relaxed);
        while latency_ms < current {
            match slot.compare_exchange_weak(current, latency_ms, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    fn update_max(slot: &AtomicU64, latency_ms: u64) {
        let mut current = slot.load(Ordering::Relaxed);
        while latency_ms > current {
            match slot.compare_exchange_weak(current, latency_ms, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    /// Requests recorded so far. Progress only; not a consistent snapshot.
    pub fn total_recorded(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Close the aggregator and compute the run summary.
    ///
    /// Taking `self` by value means no `record` call can still be in flight:
    /// the caller must hold the last reference, which in a scenario run is
    /// only true after every worker task has been joined.
    pub fn finish(self, started_at: Instant, finished_at: Instant) -> StatsSummary {
        let total = self.total.into_inner();
        let min = self.min_latency_ms.into_inner();
        let max = self.max_latency_ms.into_inner();

        StatsSummary {
            total,
            successful: self.successful.into_inner(),
            failed: self.failed.into_inner(),
            timed_out: self.timed_out.into_inner(),
            latency_sum_ms: self.latency_sum_ms.into_inner(),
            min_latency_ms: (total > 0).then_some(min),
            max_latency_ms: (total > 0).then_some(max),
            duration: finished_at.saturating_duration_since(started_at),
        }
    }
}

/// Immutable result of one scenario's aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub latency_sum_ms: u64,
    /// `None` when no request was recorded
    pub min_latency_ms: Option<u64>,
    /// `None` when no request was recorded
    pub max_latency_ms: Option<u64>,
    pub duration: Duration,
}

impl StatsSummary {
    /// Successful requests as a percentage of the total; `None` for an
    /// empty run so callers must pick a policy instead of dividing by zero
    pub fn success_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.successful as f64 * 100.0 / self.total as f64)
        }
    }

    /// Mean latency in whole milliseconds, 0 for an empty run
    pub fn avg_latency_ms(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.latency_sum_ms / self.total
        }
    }

    /// Requests per second over the scenario wall-clock duration
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.total as f64 / secs
        } else {
            0.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
