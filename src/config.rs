//! Session configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use vault_ipc::SessionConfig;
//!
//! let config = SessionConfig::new()
//!     .with_socket_path("/tmp/phantom-vault-1000.sock")
//!     .with_request_timeout(Duration::from_secs(5));
//! ```
//!
//! # Socket Path Resolution
//!
//! 1. An explicit path set on the config or builder
//! 2. The `VAULT_IPC_SOCKET` environment variable
//! 3. `/tmp/phantom-vault-<uid>.sock` for the invoking user

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use nix::unistd::getuid;

use crate::error::{Error, Result};
use crate::transport::framer::DEFAULT_MAX_FRAME_SIZE;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable overriding the default socket path.
pub const SOCKET_PATH_ENV: &str = "VAULT_IPC_SOCKET";

/// Service name used in the default socket path.
pub const SERVICE_NAME: &str = "phantom-vault";

/// Default bound on one request/response exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on establishing the connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Socket Path
// ============================================================================

/// Returns the conventional socket path for a numeric user ID.
#[inline]
#[must_use]
pub fn socket_path_for_uid(uid: u32) -> PathBuf {
    PathBuf::from(format!("/tmp/{SERVICE_NAME}-{uid}.sock"))
}

/// Returns the socket path used when none is given explicitly.
///
/// Honors [`SOCKET_PATH_ENV`], otherwise uses the invoking user's ID.
#[must_use]
pub fn default_socket_path() -> PathBuf {
    match env::var_os(SOCKET_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => socket_path_for_uid(getuid().as_raw()),
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Connection and exchange settings for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Unix domain socket the service listens on.
    pub socket_path: PathBuf,

    /// Bound on one request/response exchange. `None` waits forever.
    pub request_timeout: Option<Duration>,

    /// Bound on establishing the connection.
    pub connect_timeout: Duration,

    /// Largest frame body accepted or sent, in bytes.
    pub max_frame_size: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl SessionConfig {
    /// Creates a config with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the socket path.
    #[inline]
    #[must_use]
    pub fn with_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = path.into();
        self
    }

    /// Sets the per-request deadline.
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Removes the per-request deadline.
    #[inline]
    #[must_use]
    pub fn without_request_timeout(mut self) -> Self {
        self.request_timeout = None;
        self
    }

    /// Sets the connect deadline.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the maximum frame body size.
    #[inline]
    #[must_use]
    pub fn with_max_frame_size(mut self, max_frame_size: u32) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty socket path, a zero timeout,
    /// or a zero maximum frame size.
    pub fn validate(&self) -> Result<()> {
        if self.socket_path.as_os_str().is_empty() {
            return Err(Error::config("Socket path must not be empty"));
        }

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::config(
                "Request timeout must be greater than zero.\n\
                 Use without_request_timeout() to wait indefinitely.",
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(Error::config("Connect timeout must be greater than zero"));
        }

        if self.max_frame_size == 0 {
            return Err(Error::config("Maximum frame size must be greater than zero"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_path_for_uid() {
        assert_eq!(
            socket_path_for_uid(1000),
            PathBuf::from("/tmp/phantom-vault-1000.sock")
        );
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.max_frame_size, 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = SessionConfig::new()
            .with_socket_path("/tmp/custom.sock")
            .with_request_timeout(Duration::from_millis(250))
            .with_connect_timeout(Duration::from_secs(1))
            .with_max_frame_size(4096);

        assert_eq!(config.socket_path, PathBuf::from("/tmp/custom.sock"));
        assert_eq!(config.request_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.max_frame_size, 4096);
    }

    #[test]
    fn test_without_request_timeout() {
        let config = SessionConfig::new().without_request_timeout();
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        let config = SessionConfig::new().with_socket_path("");
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let zero_request = SessionConfig::new().with_request_timeout(Duration::ZERO);
        assert!(zero_request.validate().is_err());

        let zero_connect = SessionConfig::new().with_connect_timeout(Duration::ZERO);
        assert!(zero_connect.validate().is_err());

        let zero_frame = SessionConfig::new().with_max_frame_size(0);
        assert!(zero_frame.validate().is_err());
    }
}
