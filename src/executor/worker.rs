//! One simulated wallet client: a strictly sequential request loop

use crate::{
    client::SigningClient,
    models::ScenarioConfig,
    stats::RequestStats,
};
use std::sync::Arc;

/// Sequential actor owning exactly one signing client
pub struct Worker {
    id: usize,
    client: Box<dyn SigningClient>,
    stats: Arc<RequestStats>,
    sequence: u64,
}

impl Worker {
    pub fn new(id: usize, client: Box<dyn SigningClient>, stats: Arc<RequestStats>) -> Self {
        Self {
            id,
            client,
            stats,
            sequence: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Request identifier for a worker ordinal and sequence number. Unique
    /// across a scenario because worker ordinals are.
    pub fn request_id(worker_id: usize, sequence: u64) -> String {
        format!("client_{}_req_{}", worker_id, sequence)
    }

    fn next_request_id(&mut self) -> String {
        let id = Self::request_id(self.id, self.sequence);
        self.sequence += 1;
        id
    }

    /// Issue `requests_per_client` requests back to back, reporting each
    /// outcome immediately and pausing between requests (not after the last).
    /// Returns the number of requests issued.
    pub async fn run(mut self, config: &ScenarioConfig) -> usize {
        tracing::info!(worker_id = self.id, requests = config.requests_per_client, "Worker starting");

        for i in 0..config.requests_per_client {
            let request_id = self.next_request_id();
            let outcome = self.client.send_signing_request(&request_id).await;
            self.stats.record_outcome(&outcome);

            tracing::debug!(
                worker_id = self.id,
                request_id = %request_id,
                success = outcome.success,
                timed_out = outcome.timed_out,
                latency_ms = outcome.latency_ms,
                "Request completed"
            );

            if !config.request_delay.is_zero() && i + 1 < config.requests_per_client {
                tokio::time::sleep(config.request_delay).await;
            }
        }

        tracing::info!(worker_id = self.id, "Worker completed");
        config.requests_per_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppConfig, LoadProfile, RequestOutcome};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Records every request id it sees and always succeeds
    struct RecordingClient {
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SigningClient for RecordingClient {
        async fn send_signing_request(&self, request_id: &str) -> RequestOutcome {
            self.seen.lock().unwrap().push(request_id.to_string());
            RequestOutcome::success(Duration::from_millis(3))
        }
    }

    fn scenario(requests: usize, delay_ms: u64) -> ScenarioConfig {
        let profile = LoadProfile::new("worker-test", 1, requests, delay_ms, 1);
        AppConfig::default().scenario_config(&profile)
    }

    #[test]
    fn test_request_id_format() {
        assert_eq!(Worker::request_id(3, 17), "client_3_req_17");
    }

    #[tokio::test]
    async fn test_worker_issues_sequential_requests() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let stats = Arc::new(RequestStats::new());
        let worker = Worker::new(
            7,
            Box::new(RecordingClient { seen: Arc::clone(&seen) }),
            Arc::clone(&stats),
        );
        assert_eq!(worker.id(), 7);

        let issued = worker.run(&scenario(4, 0)).await;
        assert_eq!(issued, 4);

        let seen = seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec!["client_7_req_0", "client_7_req_1", "client_7_req_2", "client_7_req_3"]
        );
        assert_eq!(stats.total_recorded(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_between_requests() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let stats = Arc::new(RequestStats::new());
        let worker = Worker::new(0, Box::new(RecordingClient { seen }), stats);

        let start = tokio::time::Instant::now();
        worker.run(&scenario(5, 50)).await;

        // four gaps for five requests
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_zero_requests_is_noop() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let stats = Arc::new(RequestStats::new());
        let worker = Worker::new(0, Box::new(RecordingClient { seen: Arc::clone(&seen) }), Arc::clone(&stats));

        let started = Instant::now();
        assert_eq!(worker.run(&scenario(0, 1_000)).await, 0);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(stats.total_recorded(), 0);
    }
}
