//! Command-line interface

use crate::models::LoadProfile;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

const SCENARIO_NAMES: [&str; 4] = ["light", "medium", "high", "stress"];

/// Signing Load Tester - concurrent mTLS load generator for the signing coordinator
#[derive(Parser, Debug, Clone)]
#[command(name = "slt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Coordinator base URL (e.g. https://127.0.0.1:9080)
    #[arg(long)]
    pub url: Option<String>,

    /// CA certificate (PEM) used to verify the coordinator
    #[arg(long, value_name = "PATH")]
    pub ca_cert: Option<PathBuf>,

    /// Client certificate (PEM) presented to the coordinator
    #[arg(long, value_name = "PATH")]
    pub client_cert: Option<PathBuf>,

    /// Private key (PEM) for the client certificate
    #[arg(long, value_name = "PATH")]
    pub client_key: Option<PathBuf>,

    /// Coordinator ID stamped into every request header
    #[arg(long)]
    pub coordinator_id: Option<String>,

    /// Key ID to request signatures for
    #[arg(long)]
    pub key_id: Option<String>,

    /// Built-in scenario to run (can be used multiple times; default: all)
    #[arg(long = "scenario", action = ArgAction::Append, value_parser = SCENARIO_NAMES)]
    pub scenarios: Vec<String>,

    /// Run a single custom scenario with this many concurrent clients
    #[arg(long, conflicts_with = "scenarios")]
    pub clients: Option<usize>,

    /// Requests issued by each client in the custom scenario
    #[arg(long, conflicts_with = "scenarios")]
    pub requests: Option<usize>,

    /// Delay between consecutive requests of a client, in milliseconds
    #[arg(long, conflicts_with = "scenarios")]
    pub delay_ms: Option<u64>,

    /// Connection pool size shared out across the custom scenario's clients
    #[arg(long, conflicts_with = "scenarios")]
    pub pool_size: Option<usize>,

    /// Per-request timeout in seconds (applies to every scenario)
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Minimum success rate in percent for a scenario to pass
    #[arg(long, value_parser = parse_threshold)]
    pub threshold: Option<f64>,

    /// Verdict for scenarios that issue no requests (pass or fail)
    #[arg(long, value_name = "POLICY", value_parser = ["pass", "fail"])]
    pub empty_policy: Option<String>,

    /// Print the suite result as JSON after the report
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Log format (console, json, compact)
    #[arg(long, env = "LOG_FORMAT", value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// List supported environment variables, check the current ones, and exit
    #[arg(long)]
    pub env_help: bool,

    /// Write an example .env file to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with = "env_help")]
    pub init_env: Option<PathBuf>,
}

impl Cli {
    /// Validate CLI arguments for combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        let shapes_custom = self.delay_ms.is_some() || self.pool_size.is_some();
        if shapes_custom && !self.is_custom_scenario() {
            return Err("--delay-ms and --pool-size require --clients or --requests".to_string());
        }

        if self.pool_size == Some(0) {
            return Err("--pool-size must be greater than 0".to_string());
        }

        if let Some(ref url) = self.url {
            if url.trim().is_empty() {
                return Err("--url cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// True when the ad-hoc scenario flags replace the built-in suite
    pub fn is_custom_scenario(&self) -> bool {
        self.clients.is_some() || self.requests.is_some()
    }

    /// The ad-hoc scenario, with unset fields taken from the light profile
    pub fn custom_profile(&self) -> Option<LoadProfile> {
        if !self.is_custom_scenario() {
            return None;
        }
        let base = LoadProfile::light();
        Some(LoadProfile::new(
            "Custom Load",
            self.clients.unwrap_or(base.num_clients),
            self.requests.unwrap_or(base.requests_per_client),
            self.delay_ms.unwrap_or(base.request_delay_ms),
            self.pool_size.unwrap_or(base.connection_pool_size),
        ))
    }

    /// Built-in profiles selected with --scenario, in the order given
    pub fn selected_profiles(&self) -> Vec<LoadProfile> {
        self.scenarios
            .iter()
            .filter_map(|name| LoadProfile::by_name(name).ok())
            .collect()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 300 {
                Err("Duration cannot exceed 300 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Parse a success-rate percentage
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("Invalid threshold: {}", s))?;

    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("Threshold must be between 0 and 100, got: {}", s))
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
