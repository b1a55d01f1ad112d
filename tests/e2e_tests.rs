//! End-to-end scenario tests against a mock signing coordinator
//!
//! The mock speaks plain HTTP, so workers are built by a factory that uses
//! the production transport settings without trust material. Everything
//! else (worker loop, join barrier, aggregation, verdicts) is the real path.

use prost::Message;
use signing_load_tester::{
    client::{ClientFactory, SecureClient, SigningClient},
    executor::{ExecutorFactory, PassCriteria, ScenarioRunner, SuiteDriver},
    models::{AppConfig, EmptyScenarioPolicy, LoadProfile, ScenarioConfig},
    protocol::{
        wallet_coordinator_message::Payload, WalletCoordinatorMessage, WalletResponseHeader,
        WalletSigningResponse, SIGNING_REQUEST,
    },
    AppError, Result,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};

/// Production client over a plain-HTTP transport
struct PlainClientFactory;

impl ClientFactory for PlainClientFactory {
    fn create_client(&self, worker_id: usize, config: &ScenarioConfig) -> Result<Box<dyn SigningClient>> {
        let http = SecureClient::transport_builder(config)
            .build()
            .map_err(|e| AppError::tls(e.to_string()))?;
        Ok(Box::new(SecureClient::with_http_client(worker_id, config, http)))
    }
}

fn signing_reply(success: bool) -> Vec<u8> {
    WalletCoordinatorMessage {
        message_type: SIGNING_REQUEST,
        payload: Some(Payload::SigningResponse(WalletSigningResponse {
            header: Some(WalletResponseHeader {
                message_type: SIGNING_REQUEST,
                success,
                request_id: String::new(),
                timestamp: String::new(),
                error_message: if success { String::new() } else { "quorum not reached".to_string() },
            }),
            key_id: "test-key-123".to_string(),
            final_signature: if success { "3045".to_string() } else { String::new() },
            successful_shards: if success { 3 } else { 1 },
        })),
    }
    .encode_to_vec()
}

/// Rejects every `every`-th signing request it receives
struct EveryNthRejected {
    seen: AtomicUsize,
    every: usize,
}

impl Respond for EveryNthRejected {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
        ResponseTemplate::new(200).set_body_bytes(signing_reply(n % self.every != 0))
    }
}

async fn mount(server: &MockServer, responder: impl Respond + 'static) {
    Mock::given(method("POST"))
        .and(path("/api/v1/sign"))
        .respond_with(responder)
        .mount(server)
        .await;
}

fn app_config(url: &str, profiles: Vec<LoadProfile>) -> AppConfig {
    let mut config = AppConfig::default();
    config.coordinator_url = url.to_string();
    config.scenarios = profiles;
    config.enable_color = false;
    config
}

fn quiet_driver(config: &AppConfig) -> SuiteDriver {
    ExecutorFactory::create_quiet_suite_driver(config, Arc::new(PlainClientFactory))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_light_load_all_signed() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_bytes(signing_reply(true))).await;

    let config = app_config(&server.uri(), vec![LoadProfile::light()]);
    let suite = quiet_driver(&config).run(&config.scenario_configs()).await;

    let result = suite.entries[0].result.as_ref().unwrap();
    assert_eq!(result.summary.total, 100);
    assert_eq!(result.summary.successful, 100);
    assert_eq!(result.summary.success_rate(), Some(100.0));
    // 19 pauses of 50 ms per worker, run concurrently
    assert!(result.summary.duration >= Duration::from_millis(950));
    assert!(result.summary.min_latency_ms <= result.summary.max_latency_ms);
    assert!(result.passed);
    assert_eq!(suite.exit_code(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_server_errors_fail_the_scenario() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500).set_body_string("signer unavailable")).await;

    let config = app_config(&server.uri(), vec![LoadProfile::new("Errors", 4, 5, 0, 4)]);
    let suite = quiet_driver(&config).run(&config.scenario_configs()).await;

    let result = suite.entries[0].result.as_ref().unwrap();
    assert_eq!(result.summary.total, 20);
    assert_eq!(result.summary.failed, 20);
    assert_eq!(result.summary.success_rate(), Some(0.0));
    assert!(!result.passed);
    assert_eq!(suite.exit_code(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_partial_rejection_against_threshold() {
    let server = MockServer::start().await;
    mount(&server, EveryNthRejected { seen: AtomicUsize::new(0), every: 4 }).await;

    let mut config = app_config(&server.uri(), vec![LoadProfile::new("Quarter rejected", 10, 10, 0, 10)]);
    let suite = quiet_driver(&config).run(&config.scenario_configs()).await;
    let result = suite.entries[0].result.as_ref().unwrap();
    assert_eq!(result.summary.total, 100);
    assert_eq!(result.summary.failed, 25);
    assert!(!result.passed);

    // same traffic judged against a looser threshold
    server.reset().await;
    mount(&server, EveryNthRejected { seen: AtomicUsize::new(0), every: 4 }).await;
    config.success_threshold = 75.0;
    let suite = quiet_driver(&config).run(&config.scenario_configs()).await;
    assert!(suite.entries[0].passed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_request_ids_unique_on_the_wire() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_bytes(signing_reply(true))).await;

    let config = app_config(&server.uri(), vec![LoadProfile::new("Ids", 6, 7, 0, 6)]);
    quiet_driver(&config).run(&config.scenario_configs()).await;

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 42);

    let ids: HashSet<String> = received
        .iter()
        .map(|request| {
            match WalletCoordinatorMessage::decode(request.body.as_slice()).unwrap().payload {
                Some(Payload::SigningRequest(signing)) => signing.header.unwrap().request_id,
                other => panic!("unexpected payload {:?}", other),
            }
        })
        .collect();
    assert_eq!(ids.len(), 42);
    assert!(ids.contains("client_5_req_6"));
}

#[tokio::test]
async fn test_zero_client_scenario_follows_policy() {
    let server = MockServer::start().await;
    let mut config = app_config(&server.uri(), vec![LoadProfile::new("Idle", 0, 10, 0, 1)]);

    let suite = quiet_driver(&config).run(&config.scenario_configs()).await;
    assert!(suite.entries[0].result.as_ref().unwrap().summary.is_empty());
    assert_eq!(suite.exit_code(), 1);

    config.empty_policy = EmptyScenarioPolicy::Pass;
    let suite = quiet_driver(&config).run(&config.scenario_configs()).await;
    assert_eq!(suite.exit_code(), 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_suite_continues_after_failure() {
    let passing = MockServer::start().await;
    mount(&passing, ResponseTemplate::new(200).set_body_bytes(signing_reply(true))).await;
    let failing = MockServer::start().await;
    mount(&failing, ResponseTemplate::new(503)).await;

    let base = app_config(&passing.uri(), vec![]);
    let mut scenarios = vec![
        base.scenario_config(&LoadProfile::new("First", 2, 3, 0, 2)),
        base.scenario_config(&LoadProfile::new("Broken", 2, 3, 0, 2)),
        base.scenario_config(&LoadProfile::new("Last", 2, 3, 0, 2)),
    ];
    scenarios[1].coordinator_url = failing.uri();

    let runner = ScenarioRunner::new(Arc::new(PlainClientFactory), PassCriteria::default());
    let suite = SuiteDriver::new(runner).run(&scenarios).await;

    let verdicts: Vec<bool> = suite.entries.iter().map(|e| e.passed).collect();
    assert_eq!(verdicts, vec![true, false, true]);
    assert_eq!(suite.exit_code(), 1);
}
