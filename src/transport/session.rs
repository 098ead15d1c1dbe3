//! Lockstep request/response session over one Unix socket.
//!
//! A [`Session`] owns exactly one connection and one [`ClientId`]. Each call
//! writes one request frame and then reads exactly one frame back as the
//! reply. `request` methods take `&mut self`, so a session never has more
//! than one request in flight.
//!
//! # State Machine
//!
//! ```text
//! Disconnected ──connect──► Connected ──request──► Connected
//!                               │
//!                               └──disconnect / fatal error──► Disconnected
//! ```
//!
//! Disconnected is terminal: a new session must be connected to continue.
//!
//! # Correlation
//!
//! The next frame on the socket is treated as the reply to the last call.
//! A reply whose `request_id` is non-empty and differs from the one sent is
//! still returned, with a warning logged.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing::{debug, error, trace, warn};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::identifiers::{ClientId, IdGenerator, RequestId, UuidIds};
use crate::protocol::envelope::{self, Envelope};
use crate::protocol::{MessageType, ProfileList, VaultState};

use super::builder::SessionBuilder;
use super::framer::Framer;

// ============================================================================
// Constants
// ============================================================================

/// Payload characters included in debug log lines.
const LOG_PREVIEW_CHARS: usize = 50;

// ============================================================================
// SessionState
// ============================================================================

/// Observable state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket open, ready for requests.
    Connected,
    /// Socket closed by `disconnect` or a fatal I/O error.
    Disconnected,
}

// ============================================================================
// Session
// ============================================================================

/// One connection to the vault service.
pub struct Session {
    /// Open socket, `None` once disconnected.
    stream: Option<UnixStream>,
    /// Path the socket was connected to.
    socket_path: PathBuf,
    /// Identity sent with every request.
    client_id: ClientId,
    /// Source of request IDs.
    ids: Arc<dyn IdGenerator>,
    /// Frame codec with the configured size limit.
    framer: Framer,
    /// Default per-request deadline.
    request_timeout: Option<Duration>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("socket_path", &self.socket_path)
            .field("client_id", &self.client_id)
            .field("state", &self.state())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Connect / Disconnect
// ============================================================================

impl Session {
    /// Creates a builder for configuring a session.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Connects to the socket at `path` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the socket is missing or refuses.
    pub async fn connect(path: impl Into<PathBuf>) -> Result<Self> {
        let config = SessionConfig::default().with_socket_path(path);
        Self::connect_with(config, Arc::new(UuidIds)).await
    }

    /// Connects using an explicit config and identifier generator.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the config is invalid
    /// - [`Error::Connection`] if the socket is missing, refuses, or the
    ///   connect deadline passes
    pub async fn connect_with(config: SessionConfig, ids: Arc<dyn IdGenerator>) -> Result<Self> {
        config.validate()?;

        let path = config.socket_path.clone();
        let stream = match timeout(config.connect_timeout, UnixStream::connect(&path)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(Error::connection(&path, e.to_string())),
            Err(_) => {
                return Err(Error::connection(
                    &path,
                    format!(
                        "timed out after {}ms",
                        config.connect_timeout.as_millis()
                    ),
                ));
            }
        };

        Ok(Self::from_stream(stream, config, ids))
    }

    /// Wraps an already-connected stream.
    pub(crate) fn from_stream(
        stream: UnixStream,
        config: SessionConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let client_id = ids.client_id();

        debug!(
            path = %config.socket_path.display(),
            client_id = %client_id,
            "Connected to vault service"
        );

        Self {
            stream: Some(stream),
            socket_path: config.socket_path,
            client_id,
            ids,
            framer: Framer::new(config.max_frame_size),
            request_timeout: config.request_timeout,
        }
    }

    /// Closes the connection.
    ///
    /// Calling this on a disconnected session does nothing.
    pub async fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                trace!(error = %e, "Socket shutdown failed");
            }
            debug!(client_id = %self.client_id, "Disconnected from vault service");
        }
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Session {
    /// Returns `true` while the socket is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_connected() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Returns the client ID sent with every request.
    #[inline]
    #[must_use]
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the socket path.
    #[inline]
    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Returns the default per-request deadline.
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Replaces the default per-request deadline.
    #[inline]
    pub fn set_request_timeout(&mut self, request_timeout: Option<Duration>) {
        self.request_timeout = request_timeout;
    }
}

// ============================================================================
// Requests
// ============================================================================

impl Session {
    /// Sends a request and returns the reply, or `None` on any failure.
    ///
    /// Failures are logged. Use [`try_request`](Self::try_request) to
    /// inspect the error instead.
    pub async fn request(
        &mut self,
        message_type: impl Into<MessageType>,
        payload: impl Into<String>,
        request_id: Option<RequestId>,
    ) -> Option<Envelope> {
        let message_type = message_type.into();

        match self
            .try_request(message_type.clone(), payload, request_id)
            .await
        {
            Ok(response) => Some(response),
            Err(e) => {
                error!(message_type = %message_type, error = %e, "Request failed");
                None
            }
        }
    }

    /// Sends a request and returns the reply, with the default deadline.
    ///
    /// A request ID is generated when `request_id` is `None` or empty.
    ///
    /// # Errors
    ///
    /// See [`request_with_timeout`](Self::request_with_timeout).
    pub async fn try_request(
        &mut self,
        message_type: impl Into<MessageType>,
        payload: impl Into<String>,
        request_id: Option<RequestId>,
    ) -> Result<Envelope> {
        let deadline = self.request_timeout;
        self.request_with_timeout(message_type, payload, request_id, deadline)
            .await
    }

    /// Sends a request and returns the reply, with an explicit deadline.
    ///
    /// The deadline bounds the whole exchange: writing the request and
    /// reading the reply. `None` waits indefinitely.
    ///
    /// Fatal errors (see [`Error::is_fatal`]) disconnect the session.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if the session is disconnected
    /// - [`Error::FrameTooLarge`] if either frame exceeds the size limit
    /// - [`Error::RequestTimeout`] if the deadline passes
    /// - [`Error::ConnectionClosed`], [`Error::Framing`],
    ///   [`Error::IncompleteMessage`] or [`Error::Io`] on stream failures
    /// - [`Error::Decode`] if the reply is not a valid envelope
    pub async fn request_with_timeout(
        &mut self,
        message_type: impl Into<MessageType>,
        payload: impl Into<String>,
        request_id: Option<RequestId>,
        deadline: Option<Duration>,
    ) -> Result<Envelope> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }

        // An empty ID counts as omitted: the service only answers requests
        // that carry one.
        let request_id = request_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.ids.request_id());
        let request = Envelope::new(
            message_type,
            payload,
            request_id.clone(),
            self.client_id.clone(),
        );

        // Outbound size is checked before any byte is written, so a rejected
        // request leaves the stream usable.
        let body = envelope::encode(&request)?;
        self.framer.ensure_fits(body.len())?;

        debug!(
            message_type = %request.message_type,
            request_id = %request_id,
            payload = %request.payload_preview(LOG_PREVIEW_CHARS),
            "Sending request"
        );

        let reply = match self.exchange(&body, &request_id, deadline).await {
            Ok(reply) => reply,
            Err(e) => {
                if e.is_fatal() {
                    warn!(error = %e, "Fatal I/O error, disconnecting");
                    self.stream = None;
                }
                return Err(e);
            }
        };

        let response = envelope::decode(&reply)?;

        if !response.request_id.is_empty() && response.request_id != request_id {
            warn!(
                sent = %request_id,
                received = %response.request_id,
                "Reply request_id does not match request"
            );
        }

        debug!(
            message_type = %response.message_type,
            request_id = %response.request_id,
            payload = %response.payload_preview(LOG_PREVIEW_CHARS),
            "Received response"
        );

        Ok(response)
    }

    /// Writes one frame and reads one frame back under the deadline.
    async fn exchange(
        &mut self,
        body: &[u8],
        request_id: &RequestId,
        deadline: Option<Duration>,
    ) -> Result<Vec<u8>> {
        let framer = self.framer;
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        match deadline {
            Some(limit) => timeout(limit, round_trip(framer, stream, body))
                .await
                .map_err(|_| {
                    let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                    Error::request_timeout(request_id.clone(), timeout_ms)
                })?,
            None => round_trip(framer, stream, body).await,
        }
    }
}

async fn round_trip(framer: Framer, stream: &mut UnixStream, body: &[u8]) -> Result<Vec<u8>> {
    framer.write(stream, body).await?;
    framer.read(stream).await
}

// ============================================================================
// Typed Calls
// ============================================================================

impl Session {
    /// Sends a request and checks the reply against the documented pair.
    ///
    /// Types without a documented reply are returned unchecked.
    ///
    /// # Errors
    ///
    /// Any error of [`try_request`](Self::try_request), plus
    /// [`Error::UnexpectedResponse`] when the reply type does not match.
    pub async fn call(
        &mut self,
        message_type: impl Into<MessageType>,
        payload: impl Into<String>,
    ) -> Result<Envelope> {
        let message_type = message_type.into();
        let expected = message_type.expected_response();

        let response = self.try_request(message_type, payload, None).await?;
        if let Some(expected) = expected {
            response.expect_type(&expected)?;
        }
        Ok(response)
    }

    /// Sends `PING` and expects `PONG`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn ping(&mut self) -> Result<Envelope> {
        self.call(MessageType::Ping, "ping").await
    }

    /// Fetches the current vault state.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call); [`Error::Decode`] if the payload is malformed.
    pub async fn vault_state(&mut self) -> Result<VaultState> {
        self.call(MessageType::GetVaultState, "")
            .await?
            .parse_payload()
    }

    /// Fetches the profile list.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call); [`Error::Decode`] if the payload is malformed.
    pub async fn profiles(&mut self) -> Result<ProfileList> {
        self.call(MessageType::GetProfiles, "")
            .await?
            .parse_payload()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::identifiers::SequentialIds;

    /// Session wired to the returned peer stream.
    fn session_pair(config: SessionConfig) -> (Session, UnixStream) {
        let (client, server) = UnixStream::pair().expect("socket pair");
        let session = Session::from_stream(client, config, Arc::new(SequentialIds::default()));
        (session, server)
    }

    fn test_config() -> SessionConfig {
        SessionConfig::new()
            .with_socket_path("/tmp/test-vault.sock")
            .with_request_timeout(Duration::from_secs(5))
    }

    /// Reads one request from the peer and answers with `reply(request)`.
    async fn answer_once(
        mut server: UnixStream,
        reply: impl FnOnce(Envelope) -> Vec<u8>,
    ) -> UnixStream {
        let framer = Framer::default();
        let body = framer.read(&mut server).await.expect("read request");
        let request = envelope::decode(&body).expect("decode request");
        let response = reply(request);
        framer.write(&mut server, &response).await.expect("write reply");
        server
    }

    #[tokio::test]
    async fn test_request_round_trip() {
        let (mut session, server) = session_pair(test_config());

        let peer = tokio::spawn(answer_once(server, |req| {
            assert_eq!(req.message_type, MessageType::Ping);
            assert_eq!(req.payload, "ping");
            assert_eq!(req.client_id.as_str(), "client_0");
            assert_eq!(req.request_id.as_str(), "req_1");
            envelope::encode(&req.reply(MessageType::Pong, "pong")).expect("encode")
        }));

        let response = session
            .request(MessageType::Ping, "ping", None)
            .await
            .expect("response");
        assert_eq!(response.message_type, MessageType::Pong);
        assert_eq!(response.request_id.as_str(), "req_1");

        peer.await.expect("peer");
        assert!(session.is_connected());
    }

    #[tokio::test]
    async fn test_explicit_request_id_is_sent() {
        let (mut session, server) = session_pair(test_config());

        let peer = tokio::spawn(answer_once(server, |req| {
            assert_eq!(req.request_id.as_str(), "custom-42");
            envelope::encode(&req.reply(MessageType::Pong, "pong")).expect("encode")
        }));

        let response = session
            .try_request("PING", "ping", Some(RequestId::new("custom-42")))
            .await
            .expect("response");
        assert_eq!(response.request_id.as_str(), "custom-42");
        peer.await.expect("peer");
    }

    #[tokio::test]
    async fn test_empty_request_id_is_replaced() {
        let (mut session, server) = session_pair(test_config());

        let peer = tokio::spawn(answer_once(server, |req| {
            assert_eq!(req.request_id.as_str(), "req_1");
            envelope::encode(&req.reply(MessageType::VaultStateUpdate, "{}")).expect("encode")
        }));

        let response = session
            .try_request("GET_VAULT_STATE", "", Some(RequestId::new("")))
            .await
            .expect("response");
        assert_eq!(response.request_id.as_str(), "req_1");
        peer.await.expect("peer");
    }

    #[tokio::test]
    async fn test_request_timeout_accessors() {
        let (mut session, _server) = session_pair(test_config());
        assert_eq!(session.request_timeout(), Some(Duration::from_secs(5)));

        session.set_request_timeout(Some(Duration::from_millis(30)));
        assert_eq!(session.request_timeout(), Some(Duration::from_millis(30)));

        let err = session.try_request("PING", "ping", None).await.unwrap_err();
        assert!(matches!(err, Error::RequestTimeout { timeout_ms: 30, .. }));

        session.set_request_timeout(None);
        assert!(session.request_timeout().is_none());
    }

    #[tokio::test]
    async fn test_mismatched_request_id_is_still_returned() {
        let (mut session, server) = session_pair(test_config());

        let peer = tokio::spawn(answer_once(server, |_| {
            let stray = Envelope::new(
                MessageType::Pong,
                "pong",
                RequestId::new("someone-else"),
                ClientId::default(),
            );
            envelope::encode(&stray).expect("encode")
        }));

        let response = session.try_request("PING", "ping", None).await.expect("response");
        assert_eq!(response.request_id.as_str(), "someone-else");
        peer.await.expect("peer");
    }

    #[tokio::test]
    async fn test_malformed_reply_is_not_fatal() {
        let (mut session, server) = session_pair(test_config());

        let peer = tokio::spawn(answer_once(server, |_| b"not json".to_vec()));

        let err = session.try_request("PING", "ping", None).await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(session.is_connected());
        peer.await.expect("peer");
    }

    #[tokio::test]
    async fn test_peer_close_disconnects_and_returns_none() {
        let (mut session, server) = session_pair(test_config());
        drop(server);

        assert!(session.request("PING", "ping", None).await.is_none());
        assert_eq!(session.state(), SessionState::Disconnected);

        let err = session.try_request("PING", "ping", None).await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn test_timeout_when_peer_never_replies() {
        let (mut session, _server) = session_pair(test_config());

        let err = session
            .request_with_timeout("PING", "ping", None, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_oversized_request_keeps_session() {
        let (mut session, _server) = session_pair(test_config().with_max_frame_size(64));

        let err = session
            .try_request("PING", "x".repeat(128), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::FrameTooLarge { .. }));
        assert!(session.is_connected());
    }

    #[tokio::test]
    async fn test_call_checks_reply_type() {
        let (mut session, server) = session_pair(test_config());

        let peer = tokio::spawn(answer_once(server, |req| {
            envelope::encode(&req.reply(MessageType::ErrorNotification, "nope")).expect("encode")
        }));

        let err = session.ping().await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse { .. }));
        peer.await.expect("peer");
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let (mut session, _server) = session_pair(test_config());

        session.disconnect().await;
        assert_eq!(session.state(), SessionState::Disconnected);

        session.disconnect().await;
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_missing_socket() {
        let err = Session::connect("/nonexistent/dir/vault.sock")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
    }
}
