//! Console rendering of scenario banners, reports and suite verdicts

use super::colored::Painter;
use crate::{
    executor::{ScenarioResult, SuiteResult},
    models::ScenarioConfig,
};
use std::fmt::Write as _;

const RULE: &str = "========================================";
const LABEL_WIDTH: usize = 21;

/// Formats everything the load tester prints to stdout
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    painter: Painter,
    success_threshold: f64,
}

impl ReportFormatter {
    pub fn new(use_color: bool) -> Self {
        Self {
            painter: Painter::new(use_color),
            success_threshold: crate::defaults::DEFAULT_SUCCESS_THRESHOLD,
        }
    }

    /// Threshold used to color the success rate
    pub fn with_threshold(mut self, success_threshold: f64) -> Self {
        self.success_threshold = success_threshold;
        self
    }

    fn boxed_title(&self, title: &str) -> String {
        format!(
            "{}\n  {}\n{}",
            self.painter.border(RULE),
            self.painter.header(title),
            self.painter.border(RULE)
        )
    }

    fn line(out: &mut String, label: &str, value: &str) {
        let _ = writeln!(out, "{:<width$}{}", format!("{}:", label), value, width = LABEL_WIDTH);
    }

    /// Parameters of a scenario about to start
    pub fn banner(&self, config: &ScenarioConfig) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", self.boxed_title("Starting Load Test"));
        Self::line(&mut out, "Coordinator URL", &self.painter.info(&config.coordinator_url));
        Self::line(&mut out, "Wallet Clients", &config.num_clients.to_string());
        Self::line(&mut out, "Requests/Client", &config.requests_per_client.to_string());
        Self::line(&mut out, "Total Requests", &config.total_requests().to_string());
        Self::line(&mut out, "Request Delay", &format!("{} ms", config.request_delay.as_millis()));
        Self::line(&mut out, "Request Timeout", &format!("{} sec", config.request_timeout.as_secs()));
        Self::line(&mut out, "Connection Pool", &config.connection_pool_size.to_string());
        let _ = write!(out, "{}", self.painter.border(RULE));
        out
    }

    /// Aggregated results of a finished scenario
    pub fn report(&self, result: &ScenarioResult) -> String {
        let summary = &result.summary;
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", self.boxed_title("Load Test Report"));

        Self::line(&mut out, "Total Requests", &summary.total.to_string());
        let rate = match summary.success_rate() {
            Some(rate) => self
                .painter
                .rate(&format!("{:.2}%", rate), rate, self.success_threshold),
            None => "n/a".to_string(),
        };
        Self::line(&mut out, "Successful", &format!("{} ({})", summary.successful, rate));
        Self::line(&mut out, "Failed", &summary.failed.to_string());
        Self::line(&mut out, "Timeouts", &summary.timed_out.to_string());
        if result.failed_workers > 0 {
            Self::line(
                &mut out,
                "Client Setup Errors",
                &self.painter.warning(&format!("{} of {}", result.failed_workers, result.num_clients)),
            );
        }
        Self::line(&mut out, "Duration", &format!("{:.2} sec", summary.duration.as_secs_f64()));
        Self::line(&mut out, "Throughput", &format!("{:.2} req/sec", summary.throughput()));

        let _ = writeln!(out, "\nLatency Statistics:");
        let ms = |value: Option<u64>| match value {
            Some(v) => self.painter.latency(&format!("{} ms", v), v),
            None => "n/a".to_string(),
        };
        let avg = (!summary.is_empty()).then(|| summary.avg_latency_ms());
        Self::line(&mut out, "  Average", &ms(avg));
        Self::line(&mut out, "  Min", &ms(summary.min_latency_ms));
        Self::line(&mut out, "  Max", &ms(summary.max_latency_ms));
        let _ = write!(out, "{}", self.painter.border(RULE));
        out
    }

    pub fn suite_header(&self, scenario_count: usize) -> String {
        format!(
            "\n{}\n{} scenario(s) selected",
            self.boxed_title("Coordinator HTTPS Load Test Suite"),
            scenario_count
        )
    }

    pub fn scenario_heading(&self, index: usize, label: &str) -> String {
        format!("\n{}", self.painter.header(&format!("[Test {}] {}", index, label)))
    }

    pub fn verdict(&self, label: &str, passed: bool) -> String {
        if passed {
            self.painter.success(&format!("✓ {} passed!", label))
        } else {
            self.painter.error(&format!("✗ {} failed!", label))
        }
    }

    /// Final per-scenario verdicts and overall result
    pub fn suite_summary(&self, suite: &SuiteResult) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", self.boxed_title("Final Test Results"));
        for entry in &suite.entries {
            let mark = if entry.passed {
                self.painter.success("✓")
            } else {
                self.painter.error("✗")
            };
            let _ = writeln!(out, "{} {}", mark, entry.label);
        }
        let _ = writeln!(out, "{}/{} scenarios passed", suite.passed_count(), suite.entries.len());
        if suite.all_passed() {
            let _ = write!(out, "{}", self.painter.success("✓ All load tests PASSED!"));
        } else {
            let _ = write!(out, "{}", self.painter.error("✗ Some tests FAILED!"));
        }
        out
    }
}
