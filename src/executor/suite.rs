//! Sequential suite of scenarios with a single overall verdict

use super::scenario::{ScenarioResult, ScenarioRunner};
use crate::models::ScenarioConfig;
use serde::{Deserialize, Serialize};

/// Verdict for one scenario of the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteEntry {
    pub label: String,
    pub passed: bool,
    /// Absent when the scenario could not produce a summary at all
    pub result: Option<ScenarioResult>,
}

/// Ordered verdicts of every scenario in the suite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteResult {
    pub entries: Vec<SuiteEntry>,
}

impl SuiteResult {
    pub fn all_passed(&self) -> bool {
        self.entries.iter().all(|e| e.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.passed).count()
    }

    /// Process exit status: 0 when every scenario passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Runs a fixed list of scenarios in order, never stopping early
pub struct SuiteDriver {
    runner: ScenarioRunner,
}

impl SuiteDriver {
    pub fn new(runner: ScenarioRunner) -> Self {
        Self { runner }
    }

    pub async fn run(&self, scenarios: &[ScenarioConfig]) -> SuiteResult {
        let mut suite = SuiteResult::default();

        if let Some(reporter) = self.runner.reporter() {
            println!("{}", reporter.suite_header(scenarios.len()));
        }

        for (index, scenario) in scenarios.iter().enumerate() {
            if let Some(reporter) = self.runner.reporter() {
                println!("{}", reporter.scenario_heading(index + 1, &scenario.label));
            }

            let entry = match self.runner.run(scenario).await {
                Ok(result) => SuiteEntry {
                    label: scenario.label.clone(),
                    passed: result.passed,
                    result: Some(result),
                },
                Err(e) => {
                    tracing::error!(scenario = %scenario.label, error = %e, "Scenario could not be evaluated");
                    SuiteEntry {
                        label: scenario.label.clone(),
                        passed: false,
                        result: None,
                    }
                }
            };

            if let Some(reporter) = self.runner.reporter() {
                println!("{}", reporter.verdict(&entry.label, entry.passed));
            }
            suite.entries.push(entry);
        }

        if let Some(reporter) = self.runner.reporter() {
            println!("{}", reporter.suite_summary(&suite));
        }

        suite
    }
}
