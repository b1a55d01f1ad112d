//! Load execution engine
//!
//! This module contains the concurrent execution components:
//! - `Worker`: one simulated client issuing requests strictly in sequence
//! - `ScenarioRunner`: fans out one task per worker and joins them all
//!   before the shared statistics are read
//! - `SuiteDriver`: runs a list of scenarios in order and folds their
//!   verdicts into an exit status

pub mod scenario;
pub mod suite;
pub mod worker;

pub use scenario::{PassCriteria, ScenarioResult, ScenarioRunner};
pub use suite::{SuiteDriver, SuiteEntry, SuiteResult};
pub use worker::Worker;

use crate::{client::ClientFactory, models::AppConfig, output::OutputFormatterFactory};
use std::sync::Arc;

/// Factory for creating the suite driver the binary runs
pub struct ExecutorFactory;

impl ExecutorFactory {
    /// Suite driver wired to `factory`, judging with the configured
    /// threshold and printing the console report
    pub fn create_suite_driver(config: &AppConfig, factory: Arc<dyn ClientFactory>) -> SuiteDriver {
        let runner = ScenarioRunner::new(factory, PassCriteria::from_app_config(config))
            .with_reporter(OutputFormatterFactory::create_formatter(config));
        SuiteDriver::new(runner)
    }

    /// Suite driver that prints nothing; results are only returned
    pub fn create_quiet_suite_driver(config: &AppConfig, factory: Arc<dyn ClientFactory>) -> SuiteDriver {
        SuiteDriver::new(ScenarioRunner::new(factory, PassCriteria::from_app_config(config)))
    }
}
