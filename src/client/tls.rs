//! Trust material loading for the mutually-authenticated transport
//!
//! Each worker loads the CA bundle and its client identity on construction.
//! Any failure here is a setup error for that worker only.

use crate::{
    error::{AppError, Result},
    models::TlsMaterial,
};
use reqwest::{Certificate, ClientBuilder, Identity};
use std::path::Path;

const CERT_MARKER: &str = "-----BEGIN CERTIFICATE-----";
const KEY_MARKER: &str = "PRIVATE KEY-----";

/// Parsed trust anchor plus client identity, ready to install on a builder
pub struct TrustMaterial {
    roots: Vec<Certificate>,
    identity: Identity,
}

impl std::fmt::Debug for TrustMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustMaterial")
            .field("roots", &self.roots.len())
            .finish_non_exhaustive()
    }
}

impl TrustMaterial {
    /// Read and parse the CA bundle and client certificate/key pair
    pub fn load(paths: &TlsMaterial) -> Result<Self> {
        let ca_pem = read_pem(&paths.ca_cert_path, "CA certificate")?;
        let cert_pem = read_pem(&paths.client_cert_path, "client certificate")?;
        let key_pem = read_pem(&paths.client_key_path, "client key")?;

        Self::from_pem(&ca_pem, &cert_pem, &key_pem)
    }

    /// Parse trust material already held in memory
    pub fn from_pem(ca_pem: &[u8], cert_pem: &[u8], key_pem: &[u8]) -> Result<Self> {
        require_marker(ca_pem, CERT_MARKER, "CA certificate")?;
        require_marker(cert_pem, CERT_MARKER, "client certificate")?;
        require_marker(key_pem, KEY_MARKER, "client key")?;

        let roots = Certificate::from_pem_bundle(ca_pem)
            .map_err(|e| AppError::tls(format!("Failed to parse CA certificate: {}", e)))?;
        if roots.is_empty() {
            return Err(AppError::tls("CA bundle contains no certificates"));
        }

        // rustls identities are a single PEM holding both cert chain and key
        let mut identity_pem = Vec::with_capacity(cert_pem.len() + key_pem.len() + 1);
        identity_pem.extend_from_slice(cert_pem);
        if !cert_pem.ends_with(b"\n") {
            identity_pem.push(b'\n');
        }
        identity_pem.extend_from_slice(key_pem);

        let identity = Identity::from_pem(&identity_pem)
            .map_err(|e| AppError::tls(format!("Failed to load client identity: {}", e)))?;

        Ok(Self { roots, identity })
    }

    /// Install the trust anchor and client identity; built-in web roots are
    /// disabled so only the configured CA can vouch for the coordinator
    pub fn apply(self, builder: ClientBuilder) -> ClientBuilder {
        let builder = self
            .roots
            .into_iter()
            .fold(builder.tls_built_in_root_certs(false), |b, cert| b.add_root_certificate(cert));
        builder.identity(self.identity)
    }
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| AppError::tls(format!("Failed to read {} '{}': {}", what, path.display(), e)))
}

fn require_marker(pem: &[u8], marker: &str, what: &str) -> Result<()> {
    let text = String::from_utf8_lossy(pem);
    if text.contains(marker) {
        Ok(())
    } else {
        Err(AppError::tls(format!("{} is not PEM encoded (missing '{}')", what, marker)))
    }
}
