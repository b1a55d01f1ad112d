//! Mutual TLS round trips through the production client factory
//!
//! A throwaway CA issues the coordinator and client certificates. The
//! coordinator stand-in requires a client certificate signed by that CA and
//! answers every signing request over HTTP/1.1.

use prost::Message;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose,
};
use rustls::{
    pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer},
    server::WebPkiClientVerifier,
    RootCertStore, ServerConfig,
};
use signing_load_tester::{
    client::SecureClientFactory,
    executor::{PassCriteria, ScenarioResult, ScenarioRunner},
    models::{AppConfig, LoadProfile, TlsMaterial},
    protocol::{
        wallet_coordinator_message::Payload, WalletCoordinatorMessage, WalletResponseHeader,
        WalletSigningResponse, SIGNING_REQUEST,
    },
};
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

struct Authority {
    cert: Certificate,
    key: KeyPair,
}

impl Authority {
    fn new(name: &str) -> Self {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.distinguished_name.push(DnType::CommonName, name);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        let cert = params.self_signed(&key).unwrap();
        Self { cert, key }
    }

    fn issue(&self, common_name: &str, sans: &[&str], usage: ExtendedKeyUsagePurpose) -> (Certificate, KeyPair) {
        let key = KeyPair::generate().unwrap();
        let sans: Vec<String> = sans.iter().map(|s| s.to_string()).collect();
        let mut params = CertificateParams::new(sans).unwrap();
        params.distinguished_name.push(DnType::CommonName, common_name);
        params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
        params.extended_key_usages = vec![usage];
        let cert = params.signed_by(&key, &self.cert, &self.key).unwrap();
        (cert, key)
    }
}

/// PEM files for one client, written the way an operator would lay them out
fn write_trust_material(dir: &TempDir, trusted_ca: &Authority, issuer: &Authority) -> TlsMaterial {
    let (cert, key) = issuer.issue("wallet-client", &["wallet-client"], ExtendedKeyUsagePurpose::ClientAuth);

    let material = TlsMaterial {
        ca_cert_path: dir.path().join("ca-cert.pem"),
        client_cert_path: dir.path().join("client-cert.pem"),
        client_key_path: dir.path().join("client-key.pem"),
    };
    std::fs::write(&material.ca_cert_path, trusted_ca.cert.pem()).unwrap();
    std::fs::write(&material.client_cert_path, cert.pem()).unwrap();
    std::fs::write(&material.client_key_path, key.serialize_pem()).unwrap();
    material
}

fn server_config(ca: &Authority) -> ServerConfig {
    let (cert, key) = ca.issue("coordinator", &["localhost", "127.0.0.1"], ExtendedKeyUsagePurpose::ServerAuth);

    let mut roots = RootCertStore::empty();
    roots.add(ca.cert.der().clone()).unwrap();

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider.clone())
        .build()
        .unwrap();

    ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_client_cert_verifier(verifier)
        .with_single_cert(
            vec![cert.der().clone()],
            PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der())),
        )
        .unwrap()
}

fn signing_reply(request_body: &[u8]) -> Vec<u8> {
    let request_id = match WalletCoordinatorMessage::decode(request_body).ok().and_then(|m| m.payload) {
        Some(Payload::SigningRequest(request)) => request.header.map(|h| h.request_id).unwrap_or_default(),
        _ => String::new(),
    };

    WalletCoordinatorMessage {
        message_type: SIGNING_REQUEST,
        payload: Some(Payload::SigningResponse(WalletSigningResponse {
            header: Some(WalletResponseHeader {
                message_type: SIGNING_REQUEST,
                success: true,
                request_id,
                timestamp: String::new(),
                error_message: String::new(),
            }),
            key_id: "test-key-123".to_string(),
            final_signature: "3045".to_string(),
            successful_shards: 3,
        })),
    }
    .encode_to_vec()
}

/// Minimal keep-alive HTTP/1.1 loop: one protobuf reply per request
async fn serve_connection<S: AsyncRead + AsyncWrite + Unpin>(stream: S) -> std::io::Result<()> {
    let mut stream = BufReader::new(stream);
    loop {
        let mut line = String::new();
        if stream.read_line(&mut line).await? == 0 {
            return Ok(());
        }

        let mut content_length = 0usize;
        loop {
            line.clear();
            if stream.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            let header = line.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0u8; content_length];
        stream.read_exact(&mut body).await?;

        let reply = signing_reply(&body);
        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/x-protobuf\r\ncontent-length: {}\r\n\r\n",
            reply.len()
        );
        let inner = stream.get_mut();
        inner.write_all(head.as_bytes()).await?;
        inner.write_all(&reply).await?;
        inner.flush().await?;
    }
}

async fn start_coordinator(ca: &Authority) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(server_config(ca)));

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // rejected handshakes just drop the connection
                if let Ok(stream) = acceptor.accept(tcp).await {
                    let _ = serve_connection(stream).await;
                }
            });
        }
    });

    addr
}

async fn run_scenario(addr: SocketAddr, tls: TlsMaterial, clients: usize, requests: usize) -> ScenarioResult {
    let mut config = AppConfig::default();
    config.coordinator_url = format!("https://127.0.0.1:{}", addr.port());
    config.tls = tls;

    let profile = LoadProfile::new("mTLS", clients, requests, 0, clients).with_timeout_secs(10);
    let scenario = config.scenario_config(&profile);
    let runner = ScenarioRunner::new(Arc::new(SecureClientFactory), PassCriteria::default());
    runner.run(&scenario).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mutual_tls_round_trip_succeeds() {
    let ca = Authority::new("Signing Test CA");
    let addr = start_coordinator(&ca).await;
    let dir = TempDir::new().unwrap();

    let result = run_scenario(addr, write_trust_material(&dir, &ca, &ca), 3, 4).await;

    assert_eq!(result.failed_workers, 0);
    assert_eq!(result.summary.total, 12);
    assert_eq!(result.summary.successful, 12);
    assert_eq!(result.summary.failed, 0);
    assert_eq!(result.summary.timed_out, 0);
    assert!(result.passed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_client_certificate_from_unknown_ca_is_rejected() {
    let ca = Authority::new("Signing Test CA");
    let rogue = Authority::new("Rogue CA");
    let addr = start_coordinator(&ca).await;
    let dir = TempDir::new().unwrap();

    // coordinator is trusted, but the client identity is not vouched for
    let result = run_scenario(addr, write_trust_material(&dir, &ca, &rogue), 2, 3).await;

    assert_eq!(result.failed_workers, 0);
    assert_eq!(result.summary.total, 6);
    assert_eq!(result.summary.successful, 0);
    assert_eq!(result.summary.failed, 6);
    assert!(!result.passed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_coordinator_outside_configured_ca_is_rejected() {
    let ca = Authority::new("Signing Test CA");
    let other = Authority::new("Other CA");
    let addr = start_coordinator(&ca).await;
    let dir = TempDir::new().unwrap();

    // only the configured CA may vouch for the coordinator
    let result = run_scenario(addr, write_trust_material(&dir, &other, &ca), 2, 2).await;

    assert_eq!(result.failed_workers, 0);
    assert_eq!(result.summary.total, 4);
    assert_eq!(result.summary.successful, 0);
    assert!(!result.passed);
}
