//! Vault IPC - client for the PhantomVault service's local socket protocol.
//!
//! This library speaks the request/response protocol a background vault
//! service exposes over a Unix domain socket, and ships a diagnostic
//! harness that exercises it.
//!
//! # Architecture
//!
//! Three layers, leaves first:
//!
//! - **Framer**: `[u32 LE length][body]` frames on a byte stream
//! - **Envelope codec**: `{"type","payload","request_id","client_id"}` JSON
//! - **Session**: one socket, one request in flight, one reply per request
//!
//! Key design principles:
//!
//! - A [`Session`] owns its connection and [`ClientId`] for its lifetime
//! - Identifiers come from an injected [`IdGenerator`]
//! - Every exchange is bounded by a deadline unless explicitly disabled
//! - Fatal stream errors disconnect the session instead of leaving it mid-frame
//!
//! # Quick Start
//!
//! ```no_run
//! use vault_ipc::{MessageType, Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut session = Session::builder()
//!         .socket_path("/tmp/phantom-vault-1000.sock")
//!         .connect()
//!         .await?;
//!
//!     let state = session.vault_state().await?;
//!     println!("Service up for {}s", state.uptime_seconds);
//!
//!     // Raw request: `None` on any failure, already logged.
//!     if let Some(reply) = session.request(MessageType::Ping, "ping", None).await {
//!         println!("Got {}", reply.message_type);
//!     }
//!
//!     session.disconnect().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Session configuration and socket path resolution |
//! | [`diagnostics`] | Scenario harness against a live service |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Client/request IDs and their generators |
//! | [`protocol`] | Envelope, message types, nested payloads |
//! | [`transport`] | Framer, session, builder |

// ============================================================================
// Modules
// ============================================================================

/// Session configuration.
pub mod config;

/// Diagnostic scenarios against a running service.
pub mod diagnostics;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers and their generators.
pub mod identifiers;

/// Envelope and payload types.
pub mod protocol;

/// Unix socket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::{SessionConfig, default_socket_path};

// Diagnostics
pub use diagnostics::{DiagnosticReport, Scenario, ScenarioOutcome, ScenarioStatus};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ClientId, IdGenerator, RequestId, SequentialIds, UuidIds};

// Protocol types
pub use protocol::{Envelope, FolderInfo, MessageType, ProfileList, ProfileSummary, VaultState};

// Transport types
pub use transport::{Framer, Session, SessionBuilder, SessionState};
