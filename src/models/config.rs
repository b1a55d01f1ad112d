//! Configuration data model and validation

use crate::{
    error::{AppError, Result},
    logging::LogFormat,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Trust material for the mutually-authenticated transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlsMaterial {
    /// Root certificate used to validate the coordinator
    pub ca_cert_path: PathBuf,
    /// Client certificate presented to the coordinator
    pub client_cert_path: PathBuf,
    /// Private key matching `client_cert_path`
    pub client_key_path: PathBuf,
}

impl Default for TlsMaterial {
    fn default() -> Self {
        Self {
            ca_cert_path: PathBuf::from(crate::defaults::DEFAULT_CA_CERT_PATH),
            client_cert_path: PathBuf::from(crate::defaults::DEFAULT_CLIENT_CERT_PATH),
            client_key_path: PathBuf::from(crate::defaults::DEFAULT_CLIENT_KEY_PATH),
        }
    }
}

/// Body of every signing request sent during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningPayload {
    pub key_id: String,
    pub transaction_data: String,
    pub threshold: u32,
    pub total_shards: u32,
    pub required_shards: Vec<String>,
}

impl Default for SigningPayload {
    fn default() -> Self {
        Self {
            key_id: crate::defaults::DEFAULT_KEY_ID.to_string(),
            transaction_data: crate::defaults::DEFAULT_TRANSACTION_DATA.to_string(),
            threshold: crate::defaults::DEFAULT_SIGNING_THRESHOLD,
            total_shards: crate::defaults::DEFAULT_TOTAL_SHARDS,
            required_shards: crate::defaults::DEFAULT_REQUIRED_SHARDS
                .iter()
                .map(|&s| s.to_string())
                .collect(),
        }
    }
}

/// Verdict for a scenario that issued zero requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyScenarioPolicy {
    /// No failures were observed
    Pass,
    /// Nothing was exercised
    #[default]
    Fail,
}

impl EmptyScenarioPolicy {
    pub fn passes(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl FromStr for EmptyScenarioPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            _ => Err(AppError::config(format!(
                "Invalid empty scenario policy '{}': expected 'pass' or 'fail'",
                s
            ))),
        }
    }
}

/// Load parameters of one named scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProfile {
    pub name: String,
    pub num_clients: usize,
    pub requests_per_client: usize,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub connection_pool_size: usize,
}

impl LoadProfile {
    pub fn new(
        name: impl Into<String>,
        num_clients: usize,
        requests_per_client: usize,
        request_delay_ms: u64,
        connection_pool_size: usize,
    ) -> Self {
        Self {
            name: name.into(),
            num_clients,
            requests_per_client,
            request_delay_ms,
            request_timeout_secs: crate::defaults::DEFAULT_TIMEOUT.as_secs(),
            connection_pool_size,
        }
    }

    pub fn light() -> Self {
        Self::new("Light Load", 5, 20, 50, 50)
    }

    pub fn medium() -> Self {
        Self::new("Medium Load", 20, 50, 10, 100)
    }

    pub fn high() -> Self {
        Self::new("High Load", 50, 100, 0, 200)
    }

    pub fn stress() -> Self {
        Self::new("Stress", 100, 50, 0, 300)
    }

    /// The built-in suite, in increasing load order
    pub fn builtin_suite() -> Vec<Self> {
        vec![Self::light(), Self::medium(), Self::high(), Self::stress()]
    }

    /// Look up a built-in profile by its short name
    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "light" => Ok(Self::light()),
            "medium" => Ok(Self::medium()),
            "high" => Ok(Self::high()),
            "stress" => Ok(Self::stress()),
            other => Err(AppError::config(format!(
                "Unknown scenario '{}': expected light, medium, high or stress",
                other
            ))),
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn total_requests(&self) -> usize {
        self.num_clients.saturating_mul(self.requests_per_client)
    }
}

/// Immutable description of one scenario run, shared read-only by workers
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub label: String,
    pub coordinator_url: String,
    pub tls: TlsMaterial,
    pub coordinator_id: String,
    pub payload: SigningPayload,
    pub num_clients: usize,
    pub requests_per_client: usize,
    pub request_delay: Duration,
    pub request_timeout: Duration,
    pub connection_pool_size: usize,
}

impl ScenarioConfig {
    /// Full URL of the signing endpoint
    pub fn sign_url(&self) -> String {
        format!(
            "{}{}",
            self.coordinator_url.trim_end_matches('/'),
            crate::defaults::DEFAULT_SIGN_PATH
        )
    }

    /// Idle connections each worker's private pool may keep.
    ///
    /// The overall pool is split evenly across workers and floored at one
    /// so that more clients than pool slots never yields a zero-sized pool.
    pub fn per_client_pool_size(&self) -> usize {
        (self.connection_pool_size / self.num_clients.max(1)).max(1)
    }

    pub fn total_requests(&self) -> usize {
        self.num_clients.saturating_mul(self.requests_per_client)
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the signing coordinator
    #[serde(default = "default_coordinator_url")]
    pub coordinator_url: String,

    /// Trust anchor and client identity
    #[serde(default)]
    pub tls: TlsMaterial,

    /// Coordinator identity stamped into every request header
    #[serde(default = "default_coordinator_id")]
    pub coordinator_id: String,

    /// Signing request body template
    #[serde(default)]
    pub payload: SigningPayload,

    /// Minimum success rate (percent) for a scenario to pass
    #[serde(default = "default_success_threshold")]
    pub success_threshold: f64,

    /// Verdict for scenarios that issue zero requests
    #[serde(default)]
    pub empty_policy: EmptyScenarioPolicy,

    /// Scenarios to run, in order
    #[serde(default = "LoadProfile::builtin_suite")]
    pub scenarios: Vec<LoadProfile>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Print the suite result as JSON after the console report
    #[serde(default)]
    pub json_output: bool,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            coordinator_url: default_coordinator_url(),
            tls: TlsMaterial::default(),
            coordinator_id: default_coordinator_id(),
            payload: SigningPayload::default(),
            success_threshold: default_success_threshold(),
            empty_policy: EmptyScenarioPolicy::default(),
            scenarios: LoadProfile::builtin_suite(),
            enable_color: default_enable_color(),
            json_output: false,
            log_format: LogFormat::default(),
            verbose: false,
            debug: false,
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.coordinator_url.is_empty() {
            return Err(AppError::config("Coordinator URL cannot be empty"));
        }

        match url::Url::parse(&self.coordinator_url) {
            Ok(parsed) => {
                if parsed.scheme() != "https" && parsed.scheme() != "http" {
                    return Err(AppError::config(format!(
                        "Coordinator URL must use https (or http for local mocks): {}",
                        self.coordinator_url
                    )));
                }
                if parsed.host_str().is_none() {
                    return Err(AppError::config(format!(
                        "Coordinator URL has no host: {}",
                        self.coordinator_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid coordinator URL '{}': {}",
                    self.coordinator_url, e
                )));
            }
        }

        if self.coordinator_id.trim().is_empty() {
            return Err(AppError::config("Coordinator ID cannot be empty"));
        }

        if !(0.0..=100.0).contains(&self.success_threshold) {
            return Err(AppError::config(format!(
                "Success threshold must be between 0 and 100, got: {}",
                self.success_threshold
            )));
        }

        if self.scenarios.is_empty() {
            return Err(AppError::config("At least one scenario must be selected"));
        }

        for profile in &self.scenarios {
            if profile.request_timeout_secs == 0 {
                return Err(AppError::config(format!(
                    "Scenario '{}': timeout must be greater than 0",
                    profile.name
                )));
            }
            if profile.connection_pool_size == 0 {
                return Err(AppError::config(format!(
                    "Scenario '{}': connection pool size must be greater than 0",
                    profile.name
                )));
            }
        }

        if self.payload.threshold > self.payload.total_shards {
            return Err(AppError::config(format!(
                "Signing threshold {} exceeds total shards {}",
                self.payload.threshold, self.payload.total_shards
            )));
        }

        Ok(())
    }

    /// Build the immutable per-run configuration for one profile
    pub fn scenario_config(&self, profile: &LoadProfile) -> ScenarioConfig {
        ScenarioConfig {
            label: profile.name.clone(),
            coordinator_url: self.coordinator_url.clone(),
            tls: self.tls.clone(),
            coordinator_id: self.coordinator_id.clone(),
            payload: self.payload.clone(),
            num_clients: profile.num_clients,
            requests_per_client: profile.requests_per_client,
            request_delay: Duration::from_millis(profile.request_delay_ms),
            request_timeout: Duration::from_secs(profile.request_timeout_secs),
            connection_pool_size: profile.connection_pool_size,
        }
    }

    /// Scenario configurations for every selected profile, in order
    pub fn scenario_configs(&self) -> Vec<ScenarioConfig> {
        self.scenarios.iter().map(|p| self.scenario_config(p)).collect()
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("COORDINATOR_URL") {
            self.coordinator_url = url.trim().to_string();
        }

        if let Ok(path) = std::env::var("CA_CERT_PATH") {
            self.tls.ca_cert_path = PathBuf::from(path.trim());
        }

        if let Ok(path) = std::env::var("CLIENT_CERT_PATH") {
            self.tls.client_cert_path = PathBuf::from(path.trim());
        }

        if let Ok(path) = std::env::var("CLIENT_KEY_PATH") {
            self.tls.client_key_path = PathBuf::from(path.trim());
        }

        if let Ok(id) = std::env::var("COORDINATOR_ID") {
            self.coordinator_id = id.trim().to_string();
        }

        if let Ok(threshold) = std::env::var("SUCCESS_THRESHOLD") {
            self.success_threshold = threshold.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid SUCCESS_THRESHOLD value '{}': {}", threshold, e)))?;
        }

        if let Ok(policy) = std::env::var("EMPTY_SCENARIO_POLICY") {
            self.empty_policy = policy.parse()?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_coordinator_url() -> String {
    crate::defaults::DEFAULT_COORDINATOR_URL.to_string()
}

fn default_coordinator_id() -> String {
    crate::defaults::DEFAULT_COORDINATOR_ID.to_string()
}

fn default_success_threshold() -> f64 {
    crate::defaults::DEFAULT_SUCCESS_THRESHOLD
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
