//! Secure signing client and its construction seam

pub mod tls;


use crate::{
    error::{AppError, Result},
    models::{RequestOutcome, ScenarioConfig, SigningPayload},
    protocol::{self, PROTOBUF_CONTENT_TYPE},
};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Instant;
use tls::TrustMaterial;

/// One request/response exchange with the signing coordinator.
///
/// Implementations never retry and never return errors: every failure mode
/// is folded into the returned outcome.
#[async_trait]
pub trait SigningClient: Send + Sync {
    async fn send_signing_request(&self, request_id: &str) -> RequestOutcome;
}

/// Builds the private client owned by each worker
pub trait ClientFactory: Send + Sync + 'static {
    fn create_client(&self, worker_id: usize, config: &ScenarioConfig) -> Result<Box<dyn SigningClient>>;
}

/// Mutually-authenticated client bound to a single coordinator endpoint
pub struct SecureClient {
    worker_id: usize,
    http: Client,
    sign_url: String,
    coordinator_id: String,
    payload: SigningPayload,
}

impl SecureClient {
    /// Load trust material from disk and build a pooled mTLS transport
    pub fn new(worker_id: usize, config: &ScenarioConfig) -> Result<Self> {
        let material = TrustMaterial::load(&config.tls)?;
        let http = material
            .apply(Self::transport_builder(config))
            .build()
            .map_err(|e| AppError::tls(format!("Failed to build mTLS client: {}", e)))?;

        Ok(Self::with_http_client(worker_id, config, http))
    }

    /// Wrap an already-configured transport
    pub fn with_http_client(worker_id: usize, config: &ScenarioConfig, http: Client) -> Self {
        Self {
            worker_id,
            http,
            sign_url: config.sign_url(),
            coordinator_id: config.coordinator_id.clone(),
            payload: config.payload.clone(),
        }
    }

    /// Transport settings shared by every worker: overall request timeout,
    /// a private idle pool sized from the scenario, and keep-alive reuse
    pub fn transport_builder(config: &ScenarioConfig) -> reqwest::ClientBuilder {
        Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.per_client_pool_size())
            .pool_idle_timeout(crate::defaults::POOL_IDLE_TIMEOUT)
            .user_agent(concat!("signing-load-tester/", env!("CARGO_PKG_VERSION")))
    }

    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    pub fn sign_url(&self) -> &str {
        &self.sign_url
    }
}

#[async_trait]
impl SigningClient for SecureClient {
    async fn send_signing_request(&self, request_id: &str) -> RequestOutcome {
        let start = Instant::now();

        let body = match protocol::encode_signing_request(request_id, &self.coordinator_id, &self.payload) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(worker_id = self.worker_id, request_id, error = %e, "Failed to encode signing request");
                return RequestOutcome::failed(start.elapsed());
            }
        };

        let response = match self
            .http
            .post(&self.sign_url)
            .header(CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!(worker_id = self.worker_id, request_id, error = %e, "Signing request timed out");
                return RequestOutcome::timed_out(start.elapsed());
            }
            Err(e) => {
                tracing::warn!(worker_id = self.worker_id, request_id, error = %e, "Signing request failed");
                return RequestOutcome::failed(start.elapsed());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let latency = start.elapsed();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                worker_id = self.worker_id,
                request_id,
                status = status.as_u16(),
                body = %body,
                "Coordinator returned error status"
            );
            return RequestOutcome::failed(latency);
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if e.is_timeout() => {
                tracing::warn!(worker_id = self.worker_id, request_id, error = %e, "Timed out reading response body");
                return RequestOutcome::timed_out(start.elapsed());
            }
            Err(e) => {
                tracing::warn!(worker_id = self.worker_id, request_id, error = %e, "Failed to read response body");
                return RequestOutcome::failed(start.elapsed());
            }
        };
        let latency = start.elapsed();

        match protocol::decode_signing_response(&bytes) {
            Ok(response) if response.is_success() => RequestOutcome::success(latency),
            Ok(response) => {
                tracing::warn!(
                    worker_id = self.worker_id,
                    request_id,
                    error = response.error_message().unwrap_or("unspecified"),
                    "Coordinator rejected signing request"
                );
                RequestOutcome::failed(latency)
            }
            Err(e) => {
                tracing::warn!(worker_id = self.worker_id, request_id, error = %e, "Failed to decode signing response");
                RequestOutcome::failed(latency)
            }
        }
    }
}

/// Production factory: every worker loads its own trust material and pool
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureClientFactory;

impl ClientFactory for SecureClientFactory {
    fn create_client(&self, worker_id: usize, config: &ScenarioConfig) -> Result<Box<dyn SigningClient>> {
        Ok(Box::new(SecureClient::new(worker_id, config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppConfig, LoadProfile};
    use std::path::PathBuf;

    fn scenario() -> ScenarioConfig {
        AppConfig::default().scenario_config(&LoadProfile::light())
    }

    #[test]
    fn test_with_http_client_binds_endpoint() {
        let config = scenario();
        let client = SecureClient::with_http_client(4, &config, Client::new());
        assert_eq!(client.worker_id(), 4);
        assert_eq!(client.sign_url(), "https://127.0.0.1:9080/api/v1/sign");
    }

    #[test]
    fn test_transport_builder_builds_without_trust_material() {
        let mut config = scenario();
        config.num_clients = 500;
        assert!(SecureClient::transport_builder(&config).build().is_ok());
    }

    #[test]
    fn test_missing_trust_material_is_error_not_panic() {
        let mut config = scenario();
        config.tls.ca_cert_path = PathBuf::from("/nonexistent/ca-cert.pem");

        let result = SecureClient::new(0, &config);
        assert!(matches!(result, Err(AppError::Tls(_))));
    }

    #[test]
    fn test_factory_propagates_setup_error() {
        let mut config = scenario();
        config.tls.client_key_path = PathBuf::from("/nonexistent/key.pem");
        config.tls.ca_cert_path = PathBuf::from("/nonexistent/ca.pem");

        assert!(SecureClientFactory.create_client(1, &config).is_err());
    }
}
