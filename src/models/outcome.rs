//! Per-request outcome produced by a signing client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Classification of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Success,
    Failed,
    TimedOut,
}

/// Result of one signing round trip, consumed exactly once by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub success: bool,
    pub latency_ms: u64,
    pub timed_out: bool,
}

impl RequestOutcome {
    /// Coordinator accepted and signed the request
    pub fn success(latency: Duration) -> Self {
        Self {
            success: true,
            latency_ms: duration_to_ms(latency),
            timed_out: false,
        }
    }

    /// Any non-timeout failure: transport error, bad status, undecodable body,
    /// or a coordinator-side rejection
    pub fn failed(latency: Duration) -> Self {
        Self {
            success: false,
            latency_ms: duration_to_ms(latency),
            timed_out: false,
        }
    }

    /// Round trip exceeded the configured request timeout
    pub fn timed_out(latency: Duration) -> Self {
        Self {
            success: false,
            latency_ms: duration_to_ms(latency),
            timed_out: true,
        }
    }

    /// Which counter this outcome lands in. A timeout wins over the success
    /// flag so the three classes stay disjoint.
    pub fn kind(&self) -> OutcomeKind {
        if self.timed_out {
            OutcomeKind::TimedOut
        } else if self.success {
            OutcomeKind::Success
        } else {
            OutcomeKind::Failed
        }
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
