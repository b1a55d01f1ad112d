//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load a .env file if it exists. Variables already set in the process
    /// environment win over the file.
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<bool> {
        if !path.exists() {
            if debug {
                tracing::debug!(path = %path.display(), "No .env file found, using defaults and CLI arguments");
            }
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

        if debug {
            tracing::debug!(path = %path.display(), "Loaded configuration from .env file");
        }
        Ok(true)
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Signing Load Tester Configuration
#
# Values here are used as defaults and can be overridden by real
# environment variables and then by command-line arguments.

# Base URL of the signing coordinator
# COORDINATOR_URL=https://127.0.0.1:9080

# Trust material for mutual TLS (PEM files)
# CA_CERT_PATH=../../certs/local/ca-cert.pem
# CLIENT_CERT_PATH=../../certs/local/coordinator-cert.pem
# CLIENT_KEY_PATH=../../.kms/coordinator-key.pem

# Coordinator ID stamped into every request header
# COORDINATOR_ID=test-coordinator

# Minimum success rate (percent) for a scenario to pass
# SUCCESS_THRESHOLD=99.0

# Verdict for scenarios that issue no requests (pass/fail)
# EMPTY_SCENARIO_POLICY=fail

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Log format (console/json/compact)
# LOG_FORMAT=console
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "COORDINATOR_URL" => {
                url::Url::parse(value.trim())
                    .map_err(|e| AppError::config(format!("Invalid COORDINATOR_URL '{}': {}", value, e)))?;
            }
            "CA_CERT_PATH" | "CLIENT_CERT_PATH" | "CLIENT_KEY_PATH" | "COORDINATOR_ID" => {
                if value.trim().is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", key)));
                }
            }
            "SUCCESS_THRESHOLD" => {
                let threshold: f64 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid SUCCESS_THRESHOLD value '{}': {}", value, e)))?;
                if !(0.0..=100.0).contains(&threshold) {
                    return Err(AppError::config(format!("SUCCESS_THRESHOLD must be between 0 and 100, got: {}", threshold)));
                }
            }
            "EMPTY_SCENARIO_POLICY" => {
                value.parse::<crate::models::EmptyScenarioPolicy>()?;
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "LOG_FORMAT" => {
                value.parse::<crate::logging::LogFormat>()?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("COORDINATOR_URL", "Signing coordinator base URL", "https://127.0.0.1:9080"),
            ("CA_CERT_PATH", "CA certificate used to verify the coordinator", "certs/ca-cert.pem"),
            ("CLIENT_CERT_PATH", "Client certificate for mutual TLS", "certs/client-cert.pem"),
            ("CLIENT_KEY_PATH", "Client private key for mutual TLS", "certs/client-key.pem"),
            ("COORDINATOR_ID", "Coordinator ID in request headers", "test-coordinator"),
            ("SUCCESS_THRESHOLD", "Pass threshold in percent (0-100)", "99.0"),
            ("EMPTY_SCENARIO_POLICY", "Verdict for scenarios with no requests", "fail"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("LOG_FORMAT", "Log format for stderr diagnostics", "console"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}
