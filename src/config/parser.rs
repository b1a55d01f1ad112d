//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::AppConfig,
};
use std::path::PathBuf;

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read defaults from a different .env file
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Parse and build the complete configuration:
    /// defaults, then .env, then environment, then CLI, then validation
    pub fn parse(&self) -> Result<AppConfig> {
        let mut config = AppConfig::default();

        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;

        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut AppConfig) -> Result<()> {
        self.cli.validate().map_err(AppError::config)?;

        if let Some(ref url) = self.cli.url {
            config.coordinator_url = url.trim().to_string();
        }
        if let Some(ref path) = self.cli.ca_cert {
            config.tls.ca_cert_path = path.clone();
        }
        if let Some(ref path) = self.cli.client_cert {
            config.tls.client_cert_path = path.clone();
        }
        if let Some(ref path) = self.cli.client_key {
            config.tls.client_key_path = path.clone();
        }
        if let Some(ref id) = self.cli.coordinator_id {
            config.coordinator_id = id.trim().to_string();
        }
        if let Some(ref key_id) = self.cli.key_id {
            config.payload.key_id = key_id.clone();
        }

        // An ad-hoc scenario replaces the suite; --scenario narrows it
        if let Some(profile) = self.cli.custom_profile() {
            config.scenarios = vec![profile];
        } else if !self.cli.scenarios.is_empty() {
            config.scenarios = self.cli.selected_profiles();
        }

        if let Some(timeout) = self.cli.timeout {
            for profile in &mut config.scenarios {
                profile.request_timeout_secs = timeout;
            }
        }

        if let Some(threshold) = self.cli.threshold {
            config.success_threshold = threshold;
        }
        if let Some(ref policy) = self.cli.empty_policy {
            config.empty_policy = policy.parse()?;
        }
        if let Some(ref format) = self.cli.log_format {
            config.log_format = format.parse()?;
        }

        if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.json_output = self.cli.json;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<AppConfig> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &AppConfig) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Coordinator URL: {}", config.coordinator_url));
    summary.push(format!("Coordinator ID: {}", config.coordinator_id));
    summary.push(format!("CA Certificate: {}", config.tls.ca_cert_path.display()));
    summary.push(format!("Client Certificate: {}", config.tls.client_cert_path.display()));
    summary.push(format!("Client Key: {}", config.tls.client_key_path.display()));
    summary.push(format!("Key ID: {}", config.payload.key_id));
    summary.push(format!(
        "Scenarios: {}",
        config.scenarios.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
    ));
    summary.push(format!("Success Threshold: {:.2}%", config.success_threshold));
    summary.push(format!("Empty Scenario Policy: {:?}", config.empty_policy));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
