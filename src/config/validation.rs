//! Configuration validation utilities and rules
//!
//! `AppConfig::validate` rejects configurations that cannot run. The checks
//! here go further and produce warnings for configurations that will run but
//! probably not the way the operator intended.

use crate::{
    error::Result,
    models::{AppConfig, EmptyScenarioPolicy, LoadProfile},
};

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &AppConfig) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_target(&config.coordinator_url));
        warnings.extend(Self::validate_trust_material(config));
        warnings.extend(Self::validate_threshold(config));
        for profile in &config.scenarios {
            warnings.extend(Self::validate_profile(profile, config.empty_policy));
        }

        Ok(warnings)
    }

    fn validate_target(coordinator_url: &str) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let Ok(parsed) = url::Url::parse(coordinator_url) else {
            return warnings;
        };

        if parsed.scheme() == "http" {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Coordinator URL '{}' uses HTTP; mutual TLS will not be exercised", coordinator_url),
            ));
        }

        let is_local = match parsed.host() {
            Some(url::Host::Ipv4(ip)) => ip.is_loopback() || ip.is_private(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            Some(url::Host::Domain(domain)) => domain == "localhost",
            None => false,
        };
        if is_local {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Coordinator URL '{}' targets a local/private network", coordinator_url),
            ));
        }

        if !parsed.path().is_empty() && parsed.path() != "/" {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Coordinator URL includes path '{}'; the signing path is appended to it",
                    parsed.path()
                ),
            ));
        }

        warnings
    }

    fn validate_trust_material(config: &AppConfig) -> Vec<ValidationWarning> {
        let files = [
            ("CA certificate", config.tls.ca_cert_path.as_path()),
            ("Client certificate", config.tls.client_cert_path.as_path()),
            ("Client key", config.tls.client_key_path.as_path()),
        ];

        files
            .iter()
            .filter(|(_, path)| !path.exists())
            .map(|(what, path)| {
                ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("{} '{}' not found; every client will fail to start", what, path.display()),
                )
            })
            .collect()
    }

    fn validate_threshold(config: &AppConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        if config.success_threshold >= 100.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Success threshold of 100% fails a scenario on any single error".to_string(),
            ));
        } else if config.success_threshold < 50.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Success threshold of {:.1}% is unusually permissive", config.success_threshold),
            ));
        }
        warnings
    }

    fn validate_profile(profile: &LoadProfile, policy: EmptyScenarioPolicy) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if profile.total_requests() == 0 {
            let verdict = if policy.passes() { "pass" } else { "fail" };
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Scenario '{}' issues no requests and will {}", profile.name, verdict),
            ));
        }

        if profile.num_clients > profile.connection_pool_size {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Scenario '{}': {} clients exceed pool size {}; each client keeps 1 idle connection",
                    profile.name, profile.num_clients, profile.connection_pool_size
                ),
            ));
        }

        if profile.request_timeout_secs < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Scenario '{}': timeout of {}s may count slow signatures as timeouts",
                    profile.name, profile.request_timeout_secs
                ),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Emit through the log at the matching level
    pub fn log(&self) {
        match self.level {
            ValidationLevel::Info => tracing::info!("{}", self.message),
            ValidationLevel::Warning => tracing::warn!("{}", self.message),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &AppConfig) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
