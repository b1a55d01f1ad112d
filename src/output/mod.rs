//! Output formatting and display
//!
//! Console output (banners, reports, verdicts) goes to stdout; diagnostics
//! go through `tracing` to stderr. The JSON rendering of a suite is for
//! scripts consuming the result.

mod colored;
mod report;

pub use colored::{ColorScheme, LatencyLevel, Painter};
pub use report::ReportFormatter;

use crate::{error::Result, executor::SuiteResult, models::AppConfig};

/// Factory for creating the formatter matching the configuration
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    pub fn create_formatter(config: &AppConfig) -> ReportFormatter {
        ReportFormatter::new(config.enable_color).with_threshold(config.success_threshold)
    }
}

/// Pretty-printed JSON document for a finished suite
pub fn suite_to_json(suite: &SuiteResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(suite)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SuiteEntry;

    #[test]
    fn test_suite_json() {
        let suite = SuiteResult {
            entries: vec![SuiteEntry {
                label: "Medium Load".to_string(),
                passed: true,
                result: None,
            }],
        };
        let json = suite_to_json(&suite).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["entries"][0]["label"], "Medium Load");
        assert_eq!(parsed["entries"][0]["result"], serde_json::Value::Null);
    }

    #[test]
    fn test_factory_respects_color_flag() {
        let mut config = AppConfig::default();
        config.enable_color = false;
        let formatter = OutputFormatterFactory::create_formatter(&config);
        assert_eq!(formatter.verdict("x", false), "✗ x failed!");
    }
}
