//! Unix socket transport layer.
//!
//! This module moves envelopes between the client and the vault service
//! over a Unix domain socket.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Client (Rust)  │                              │  Vault service  │
//! │                 │      Unix domain socket      │                 │
//! │  Session        │◄────────────────────────────►│  IPC server     │
//! │  → Framer       │  /tmp/phantom-vault-UID.sock │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Session::connect` / `SessionBuilder::connect` - Open the socket
//! 2. `Session::request` - Write one frame, read one frame back
//! 3. `Session::disconnect` - Close the socket
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent session configuration |
//! | `framer` | Length-prefixed framing |
//! | `session` | Connection and request/response exchange |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent session configuration.
pub mod builder;

/// Length-prefixed framing on a byte stream.
pub mod framer;

/// Connection and request/response exchange.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionBuilder;
pub use framer::Framer;
pub use session::{Session, SessionState};
