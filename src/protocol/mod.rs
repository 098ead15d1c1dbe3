//! Vault IPC message types.
//!
//! This module defines the envelope carried inside every frame and the
//! JSON documents nested in its payload.
//!
//! # Protocol Overview
//!
//! | Layer | Format |
//! |-------|--------|
//! | Frame | `[u32 little-endian length][body]` (see [`transport::framer`]) |
//! | Envelope | `{"type", "payload", "request_id", "client_id"}` as UTF-8 JSON |
//! | Payload | Opaque string, often a nested JSON document |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `envelope` | Envelope struct and codec |
//! | `message_type` | Message type vocabulary |
//! | `payload` | Typed nested payloads |
//!
//! [`transport::framer`]: crate::transport::framer

// ============================================================================
// Submodules
// ============================================================================

/// Envelope struct and its JSON codec.
pub mod envelope;

/// Message type vocabulary.
pub mod message_type;

/// Typed nested payload documents.
pub mod payload;

// ============================================================================
// Re-exports
// ============================================================================

pub use envelope::Envelope;
pub use message_type::MessageType;
pub use payload::{FolderInfo, ProfileList, ProfileSummary, VaultState};
