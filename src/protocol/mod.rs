//! Wallet ↔ coordinator wire schema
//!
//! The coordinator speaks a protobuf envelope (`WalletCoordinatorMessage`)
//! whose payload is either a signing request or a signing response. The
//! message structs are derived with `prost` directly instead of generated
//! from a `.proto` file so the crate has no build-time protoc dependency.

use crate::{
    error::{AppError, Result},
    models::SigningPayload,
};
use prost::Message;

/// Message type code for a wallet signing request
pub const SIGNING_REQUEST: u32 = 1001;

/// Content type the coordinator expects on `/api/v1/sign`
pub const PROTOBUF_CONTENT_TYPE: &str = "application/protobuf";

/// Top-level envelope exchanged with the coordinator
#[derive(Clone, PartialEq, Message)]
pub struct WalletCoordinatorMessage {
    #[prost(uint32, tag = "1")]
    pub message_type: u32,
    #[prost(oneof = "wallet_coordinator_message::Payload", tags = "2, 3")]
    pub payload: Option<wallet_coordinator_message::Payload>,
}

pub mod wallet_coordinator_message {
    /// Envelope payload variants
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "2")]
        SigningRequest(super::WalletSigningRequest),
        #[prost(message, tag = "3")]
        SigningResponse(super::WalletSigningResponse),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct WalletRequestHeader {
    #[prost(uint32, tag = "1")]
    pub message_type: u32,
    #[prost(string, tag = "2")]
    pub request_id: String,
    #[prost(string, tag = "3")]
    pub timestamp: String,
    #[prost(string, tag = "4")]
    pub coordinator_id: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct WalletResponseHeader {
    #[prost(uint32, tag = "1")]
    pub message_type: u32,
    #[prost(bool, tag = "2")]
    pub success: bool,
    #[prost(string, tag = "3")]
    pub request_id: String,
    #[prost(string, tag = "4")]
    pub timestamp: String,
    #[prost(string, tag = "5")]
    pub error_message: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct WalletSigningRequest {
    #[prost(message, optional, tag = "1")]
    pub header: Option<WalletRequestHeader>,
    #[prost(string, tag = "2")]
    pub key_id: String,
    #[prost(string, tag = "3")]
    pub transaction_data: String,
    #[prost(uint32, tag = "4")]
    pub threshold: u32,
    #[prost(uint32, tag = "5")]
    pub total_shards: u32,
    #[prost(string, repeated, tag = "6")]
    pub required_shards: Vec<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct WalletSigningResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<WalletResponseHeader>,
    #[prost(string, tag = "2")]
    pub key_id: String,
    #[prost(string, tag = "3")]
    pub final_signature: String,
    #[prost(uint32, tag = "4")]
    pub successful_shards: u32,
}

impl WalletCoordinatorMessage {
    /// Build a signing request envelope for one load-test request
    pub fn signing_request(request_id: &str, coordinator_id: &str, payload: &SigningPayload) -> Self {
        let request = WalletSigningRequest {
            header: Some(WalletRequestHeader {
                message_type: SIGNING_REQUEST,
                request_id: request_id.to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                coordinator_id: coordinator_id.to_string(),
            }),
            key_id: payload.key_id.clone(),
            transaction_data: payload.transaction_data.clone(),
            threshold: payload.threshold,
            total_shards: payload.total_shards,
            required_shards: payload.required_shards.clone(),
        };

        Self {
            message_type: SIGNING_REQUEST,
            payload: Some(wallet_coordinator_message::Payload::SigningRequest(request)),
        }
    }

    /// Borrow the signing response payload, if this envelope carries one
    pub fn signing_response(&self) -> Option<&WalletSigningResponse> {
        match &self.payload {
            Some(wallet_coordinator_message::Payload::SigningResponse(response)) => Some(response),
            _ => None,
        }
    }
}

impl WalletSigningResponse {
    /// Success flag from the embedded header; a missing header is a failure
    pub fn is_success(&self) -> bool {
        self.header.as_ref().map(|h| h.success).unwrap_or(false)
    }

    /// Coordinator-provided error text, if any
    pub fn error_message(&self) -> Option<&str> {
        self.header
            .as_ref()
            .map(|h| h.error_message.as_str())
            .filter(|m| !m.is_empty())
    }
}

/// Serialize a signing request to its binary wire form
pub fn encode_signing_request(
    request_id: &str,
    coordinator_id: &str,
    payload: &SigningPayload,
) -> Result<Vec<u8>> {
    let message = WalletCoordinatorMessage::signing_request(request_id, coordinator_id, payload);
    let mut buf = Vec::with_capacity(message.encoded_len());
    message.encode(&mut buf)?;
    Ok(buf)
}

/// Deserialize a coordinator reply and extract its signing response
pub fn decode_signing_response(bytes: &[u8]) -> Result<WalletSigningResponse> {
    let message = WalletCoordinatorMessage::decode(bytes)?;
    match message.payload {
        Some(wallet_coordinator_message::Payload::SigningResponse(response)) => Ok(response),
        _ => Err(AppError::decode(format!(
            "Envelope (message type {}) carries no signing response",
            message.message_type
        ))),
    }
}
