//! Signing Load Tester
//!
//! Drives a fixed population of simulated wallet clients against the signing
//! coordinator over mutually-authenticated TLS, aggregates every request
//! outcome into lock-free counters, and decides pass/fail per scenario
//! against a success-rate threshold.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod protocol;
pub mod stats;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{AppConfig, EmptyScenarioPolicy, LoadProfile, RequestOutcome, ScenarioConfig};
pub use stats::{RequestStats, StatsSummary};
pub use executor::{ScenarioResult, ScenarioRunner, SuiteDriver, SuiteResult, Worker};
pub use client::{ClientFactory, SecureClient, SecureClientFactory, SigningClient};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_COORDINATOR_URL: &str = "https://127.0.0.1:9080";
    pub const DEFAULT_SIGN_PATH: &str = "/api/v1/sign";
    pub const DEFAULT_CA_CERT_PATH: &str = "../../certs/local/ca-cert.pem";
    pub const DEFAULT_CLIENT_CERT_PATH: &str = "../../certs/local/coordinator-cert.pem";
    pub const DEFAULT_CLIENT_KEY_PATH: &str = "../../.kms/coordinator-key.pem";
    pub const DEFAULT_COORDINATOR_ID: &str = "test-coordinator";

    pub const DEFAULT_SUCCESS_THRESHOLD: f64 = 99.0;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    pub const DEFAULT_KEY_ID: &str = "test-key-123";
    pub const DEFAULT_TRANSACTION_DATA: &str = "0xabcdef1234567890";
    pub const DEFAULT_SIGNING_THRESHOLD: u32 = 2;
    pub const DEFAULT_TOTAL_SHARDS: u32 = 3;
    pub const DEFAULT_REQUIRED_SHARDS: &[&str] = &["shard0", "shard1", "shard2"];

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
