//! Envelope type and its JSON codec.
//!
//! Every frame on the wire carries exactly one envelope, serialized as
//! UTF-8 JSON.
//!
//! # Format
//!
//! ```json
//! {
//!   "type": "GET_VAULT_STATE",
//!   "payload": "",
//!   "request_id": "req_1",
//!   "client_id": "client_0"
//! }
//! ```
//!
//! `type` and `payload` are required on decode. `request_id` and
//! `client_id` default to empty strings when absent; outbound envelopes
//! always carry all four fields.

// ============================================================================
// Imports
// ============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::{ClientId, RequestId};

use super::MessageType;

// ============================================================================
// Envelope
// ============================================================================

/// One logical message exchanged with the vault service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message kind.
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Opaque body, frequently a nested JSON document.
    pub payload: String,

    /// Caller-assigned correlation token.
    #[serde(default)]
    pub request_id: RequestId,

    /// Identifies the sending session.
    #[serde(default)]
    pub client_id: ClientId,
}

impl Envelope {
    /// Creates a fully-populated envelope.
    #[inline]
    #[must_use]
    pub fn new(
        message_type: impl Into<MessageType>,
        payload: impl Into<String>,
        request_id: RequestId,
        client_id: ClientId,
    ) -> Self {
        Self {
            message_type: message_type.into(),
            payload: payload.into(),
            request_id,
            client_id,
        }
    }

    /// Creates a reply carrying this envelope's request and client IDs.
    #[inline]
    #[must_use]
    pub fn reply(&self, message_type: impl Into<MessageType>, payload: impl Into<String>) -> Self {
        Self::new(
            message_type,
            payload,
            self.request_id.clone(),
            self.client_id.clone(),
        )
    }

    /// Returns `true` if this is an `ERROR_NOTIFICATION`.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.message_type == MessageType::ErrorNotification
    }

    /// Checks that this envelope has the given type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] on a mismatch.
    pub fn expect_type(&self, expected: &MessageType) -> Result<&Self> {
        if &self.message_type == expected {
            Ok(self)
        } else {
            Err(Error::unexpected_response(
                expected.as_str(),
                self.message_type.as_str(),
            ))
        }
    }

    /// Parses the payload string as a typed JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the payload is not valid JSON for `T`.
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.payload).map_err(|e| {
            Error::decode(format!(
                "{} payload is not valid JSON: {e}",
                self.message_type
            ))
        })
    }

    /// Parses the payload string as an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the payload is not valid JSON.
    #[inline]
    pub fn payload_json(&self) -> Result<Value> {
        self.parse_payload()
    }

    /// Returns at most `max_chars` characters of the payload for log lines.
    #[must_use]
    pub fn payload_preview(&self, max_chars: usize) -> String {
        let mut chars = self.payload.chars();
        let preview: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{preview}...")
        } else {
            preview
        }
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Serializes an envelope to UTF-8 JSON bytes.
///
/// # Errors
///
/// Returns [`Error::Json`] if serialization fails.
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(envelope)?)
}

/// Deserializes an envelope from UTF-8 JSON bytes.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not UTF-8, not JSON, or lack
/// the `type` or `payload` field.
pub fn decode(bytes: &[u8]) -> Result<Envelope> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::decode(format!("envelope is not valid UTF-8: {e}")))?;

    serde_json::from_str(text).map_err(|e| Error::decode(format!("invalid envelope: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
