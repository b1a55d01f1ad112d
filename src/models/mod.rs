//! Data models and structures for the signing load tester

pub mod config;
pub mod outcome;

// Re-export main model types
pub use config::{AppConfig, EmptyScenarioPolicy, LoadProfile, ScenarioConfig, SigningPayload, TlsMaterial};
pub use outcome::{OutcomeKind, RequestOutcome};
