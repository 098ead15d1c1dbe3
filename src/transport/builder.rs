//! Builder pattern for session configuration.
//!
//! Provides a fluent API for configuring and connecting [`Session`]s.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use vault_ipc::Session;
//!
//! # async fn example() -> vault_ipc::Result<()> {
//! let mut session = Session::builder()
//!     .socket_path("/tmp/phantom-vault-1000.sock")
//!     .request_timeout(Duration::from_secs(5))
//!     .connect()
//!     .await?;
//!
//! session.ping().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::identifiers::{IdGenerator, UuidIds};

use super::session::Session;

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for configuring a [`Session`].
///
/// Use [`Session::builder()`] to create a new builder.
#[derive(Clone, Default)]
pub struct SessionBuilder {
    /// Connection and exchange settings.
    config: SessionConfig,
    /// Identifier generator, [`UuidIds`] when unset.
    ids: Option<Arc<dyn IdGenerator>>,
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("custom_ids", &self.ids.is_some())
            .finish()
    }
}

// ============================================================================
// SessionBuilder Implementation
// ============================================================================

impl SessionBuilder {
    /// Creates a new builder with default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    #[inline]
    #[must_use]
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the socket path.
    #[inline]
    #[must_use]
    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.socket_path = path.into();
        self
    }

    /// Sets the per-request deadline.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Waits indefinitely for replies.
    #[inline]
    #[must_use]
    pub fn no_request_timeout(mut self) -> Self {
        self.config.request_timeout = None;
        self
    }

    /// Sets the connect deadline.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the maximum frame body size.
    #[inline]
    #[must_use]
    pub fn max_frame_size(mut self, max_frame_size: u32) -> Self {
        self.config.max_frame_size = max_frame_size;
        self
    }

    /// Sets the identifier generator.
    #[inline]
    #[must_use]
    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Returns the configuration built so far.
    #[inline]
    #[must_use]
    pub fn config_ref(&self) -> &SessionConfig {
        &self.config
    }

    /// Validates the configuration and connects.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) if the configuration is invalid
    /// - [`Error::Connection`](crate::Error::Connection) if the socket cannot be reached
    pub async fn connect(self) -> Result<Session> {
        let ids = self.ids.unwrap_or_else(|| Arc::new(UuidIds));
        Session::connect_with(self.config, ids).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::Error;
    use crate::identifiers::SequentialIds;

    #[test]
    fn test_new_uses_default_config() {
        let builder = SessionBuilder::new();
        assert_eq!(builder.config_ref(), &SessionConfig::default());
        assert!(builder.ids.is_none());
    }

    #[test]
    fn test_setters() {
        let builder = SessionBuilder::new()
            .socket_path("/tmp/vault.sock")
            .request_timeout(Duration::from_secs(2))
            .connect_timeout(Duration::from_millis(300))
            .max_frame_size(2048)
            .id_generator(SequentialIds::default());

        let config = builder.config_ref();
        assert_eq!(config.socket_path, PathBuf::from("/tmp/vault.sock"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.connect_timeout, Duration::from_millis(300));
        assert_eq!(config.max_frame_size, 2048);
        assert!(builder.ids.is_some());
    }

    #[test]
    fn test_config_replaces_whole_configuration() {
        let config = SessionConfig::new()
            .with_socket_path("/tmp/other.sock")
            .without_request_timeout()
            .with_max_frame_size(4096);

        let builder = SessionBuilder::new()
            .max_frame_size(16)
            .config(config.clone());
        assert_eq!(builder.config_ref(), &config);
    }

    #[test]
    fn test_no_request_timeout() {
        let builder = SessionBuilder::new().no_request_timeout();
        assert!(builder.config_ref().request_timeout.is_none());
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let err = SessionBuilder::new()
            .socket_path("/tmp/vault.sock")
            .max_frame_size(0)
            .connect()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
