//! Error types for the vault IPC client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use vault_ipc::{Result, Session};
//!
//! async fn example(session: &mut Session) -> Result<()> {
//!     let state = session.vault_state().await?;
//!     println!("uptime: {}s", state.uptime_seconds);
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Connection | [`Error::Connection`], [`Error::NotConnected`], [`Error::ConnectionClosed`] |
//! | Framing | [`Error::Framing`], [`Error::IncompleteMessage`], [`Error::FrameTooLarge`] |
//! | Envelope | [`Error::Decode`], [`Error::UnexpectedResponse`] |
//! | Execution | [`Error::RequestTimeout`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::RequestId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when session configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Socket connection failed.
    ///
    /// Returned when the socket does not exist or refuses the connection.
    #[error("Connection to {} failed: {message}", .path.display())]
    Connection {
        /// Socket path that was dialed.
        path: PathBuf,
        /// Description of the connection error.
        message: String,
    },

    /// Request attempted on a disconnected session.
    #[error("Not connected")]
    NotConnected,

    /// Peer closed the stream before sending a frame.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Framing Errors
    // ========================================================================
    /// Length header truncated.
    ///
    /// Returned when the stream ends after some, but not all, header bytes.
    #[error("Framing error: truncated length header ({received} of 4 bytes)")]
    Framing {
        /// Header bytes obtained before the stream ended.
        received: usize,
    },

    /// Frame body shorter than its declared length.
    ///
    /// Returned when the peer closes the stream mid-body.
    #[error("Incomplete message received: {received}/{expected} bytes")]
    IncompleteMessage {
        /// Body bytes obtained before the stream ended.
        received: usize,
        /// Body length declared by the header.
        expected: usize,
    },

    /// Frame length exceeds the configured maximum.
    #[error("Frame of {length} bytes exceeds maximum of {max} bytes")]
    FrameTooLarge {
        /// Offending frame length.
        length: usize,
        /// Configured maximum.
        max: u32,
    },

    // ========================================================================
    // Envelope Errors
    // ========================================================================
    /// Envelope could not be decoded.
    ///
    /// Returned for invalid UTF-8, malformed JSON, or missing required fields.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// Response type does not match the request's expected response.
    #[error("Protocol error: expected {expected}, got {actual}")]
    UnexpectedResponse {
        /// Expected response type.
        expected: String,
        /// Received response type.
        actual: String,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// No response received before the deadline.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Connection {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a truncated header error.
    #[inline]
    pub fn framing(received: usize) -> Self {
        Self::Framing { received }
    }

    /// Creates an incomplete message error.
    #[inline]
    pub fn incomplete_message(received: usize, expected: usize) -> Self {
        Self::IncompleteMessage { received, expected }
    }

    /// Creates a frame too large error.
    #[inline]
    pub fn frame_too_large(length: usize, max: u32) -> Self {
        Self::FrameTooLarge { length, max }
    }

    /// Creates a decode error.
    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an unexpected response error.
    #[inline]
    pub fn unexpected_response(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimeout { .. })
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::NotConnected | Self::ConnectionClosed
        )
    }

    /// Returns `true` if the peer violated the framing or envelope contract.
    #[inline]
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::Framing { .. }
                | Self::IncompleteMessage { .. }
                | Self::FrameTooLarge { .. }
                | Self::Decode { .. }
                | Self::UnexpectedResponse { .. }
        )
    }

    /// Returns `true` if the stream can no longer be trusted after this error.
    ///
    /// A session that hits a fatal error disconnects. Decode and response
    /// type errors leave the stream frame-aligned and are not fatal.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConnectionClosed
                | Self::Framing { .. }
                | Self::IncompleteMessage { .. }
                | Self::FrameTooLarge { .. }
                | Self::RequestTimeout { .. }
                | Self::Io(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::connection("/tmp/missing.sock", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Connection to /tmp/missing.sock failed: No such file or directory"
        );
    }

    #[test]
    fn test_incomplete_message_display() {
        let err = Error::incomplete_message(3, 10);
        assert_eq!(err.to_string(), "Incomplete message received: 3/10 bytes");
    }

    #[test]
    fn test_framing_display() {
        let err = Error::framing(2);
        assert_eq!(
            err.to_string(),
            "Framing error: truncated length header (2 of 4 bytes)"
        );
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::request_timeout(RequestId::new("req_1"), 5000);
        let other_err = Error::decode("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("/tmp/x.sock", "refused").is_connection_error());
        assert!(Error::NotConnected.is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::config("test").is_connection_error());
    }

    #[test]
    fn test_is_protocol_error() {
        assert!(Error::framing(1).is_protocol_error());
        assert!(Error::decode("bad json").is_protocol_error());
        assert!(Error::unexpected_response("PONG", "ERROR_NOTIFICATION").is_protocol_error());
        assert!(!Error::ConnectionClosed.is_protocol_error());
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::incomplete_message(1, 2).is_fatal());
        assert!(Error::request_timeout(RequestId::new("r"), 1).is_fatal());
        assert!(!Error::decode("bad json").is_fatal());
        assert!(!Error::unexpected_response("PONG", "UNKNOWN").is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::BrokenPipe, "broken pipe");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
