//! Fan-out/fan-in execution of one load scenario

use super::worker::Worker;
use crate::{
    client::ClientFactory,
    error::{AppError, Result},
    models::{AppConfig, EmptyScenarioPolicy, ScenarioConfig},
    output::ReportFormatter,
    stats::{RequestStats, StatsSummary},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Rule turning a scenario summary into pass/fail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassCriteria {
    /// Minimum success rate, in percent, inclusive
    pub success_threshold: f64,
    pub empty_policy: EmptyScenarioPolicy,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            success_threshold: crate::defaults::DEFAULT_SUCCESS_THRESHOLD,
            empty_policy: EmptyScenarioPolicy::default(),
        }
    }
}

impl PassCriteria {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            success_threshold: config.success_threshold,
            empty_policy: config.empty_policy,
        }
    }

    pub fn evaluate(&self, summary: &StatsSummary) -> bool {
        match summary.success_rate() {
            Some(rate) => rate >= self.success_threshold,
            None => self.empty_policy.passes(),
        }
    }
}

/// Outcome of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub run_id: Uuid,
    pub label: String,
    pub num_clients: usize,
    /// Workers whose client could not be constructed
    pub failed_workers: usize,
    pub summary: StatsSummary,
    pub passed: bool,
}

enum WorkerExit {
    Completed,
    SetupFailed,
}

/// Runs scenarios: spawns one task per worker, waits for all of them, then
/// aggregates and judges the result
pub struct ScenarioRunner {
    factory: Arc<dyn ClientFactory>,
    criteria: PassCriteria,
    reporter: Option<ReportFormatter>,
}

impl ScenarioRunner {
    pub fn new(factory: Arc<dyn ClientFactory>, criteria: PassCriteria) -> Self {
        Self {
            factory,
            criteria,
            reporter: None,
        }
    }

    /// Print the scenario banner and report to stdout while running
    pub fn with_reporter(mut self, reporter: ReportFormatter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn criteria(&self) -> &PassCriteria {
        &self.criteria
    }

    pub fn reporter(&self) -> Option<&ReportFormatter> {
        self.reporter.as_ref()
    }

    /// Execute one scenario to completion.
    ///
    /// Errors only if the aggregator is still shared after every worker has
    /// been joined; individual request and client failures are folded into
    /// the summary.
    pub async fn run(&self, config: &ScenarioConfig) -> Result<ScenarioResult> {
        let run_id = Uuid::new_v4();
        if let Some(reporter) = &self.reporter {
            println!("{}", reporter.banner(config));
        }
        tracing::info!(
            %run_id,
            scenario = %config.label,
            clients = config.num_clients,
            requests_per_client = config.requests_per_client,
            "Starting scenario"
        );

        let shared_config = Arc::new(config.clone());
        let stats = Arc::new(RequestStats::new());
        let started_at = Instant::now();

        let handles: Vec<_> = (0..config.num_clients)
            .map(|worker_id| {
                let factory = Arc::clone(&self.factory);
                let config = Arc::clone(&shared_config);
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    match factory.create_client(worker_id, &config) {
                        Ok(client) => {
                            Worker::new(worker_id, client, stats).run(&config).await;
                            WorkerExit::Completed
                        }
                        Err(e) => {
                            tracing::error!(worker_id, error = %e, "Failed to create client");
                            WorkerExit::SetupFailed
                        }
                    }
                })
            })
            .collect();

        // join barrier: every worker task has finished (or panicked) past here
        let mut failed_workers = 0;
        for joined in futures::future::join_all(handles).await {
            match joined {
                Ok(WorkerExit::Completed) => {}
                Ok(WorkerExit::SetupFailed) => failed_workers += 1,
                Err(e) => {
                    tracing::error!(error = %e, "Worker task aborted");
                    failed_workers += 1;
                }
            }
        }
        let finished_at = Instant::now();

        let stats = Arc::try_unwrap(stats).map_err(|_| {
            AppError::internal("Statistics still shared after all workers were joined")
        })?;
        let summary = stats.finish(started_at, finished_at);
        let passed = self.criteria.evaluate(&summary);

        tracing::info!(
            %run_id,
            scenario = %config.label,
            total = summary.total,
            successful = summary.successful,
            failed_workers,
            passed,
            "Scenario finished"
        );

        let result = ScenarioResult {
            run_id,
            label: config.label.clone(),
            num_clients: config.num_clients,
            failed_workers,
            summary,
            passed,
        };

        if let Some(reporter) = &self.reporter {
            println!("{}", reporter.report(&result));
        }

        Ok(result)
    }
}
