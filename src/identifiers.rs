//! Type-safe identifiers carried in every envelope.
//!
//! Newtype wrappers keep client and request identifiers from being mixed
//! up at compile time. Both serialize as plain JSON strings.
//!
//! Identifiers are produced by an [`IdGenerator`] injected into the
//! [`Session`](crate::Session), so generation is explicit and testable:
//!
//! | Generator | Client ID | Request ID |
//! |-----------|-----------|------------|
//! | [`UuidIds`] | `client_<uuid-v4>` | `req_<uuid-v4>` |
//! | [`SequentialIds`] | `client_<n>` | `req_<n>` |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ClientId
// ============================================================================

/// Identifies one connected session for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a client ID from any string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the ID is empty (absent on an inbound message).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// RequestId
// ============================================================================

/// Correlation token assigned by the caller to each request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Creates a request ID from any string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the ID is empty (absent on an inbound message).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// IdGenerator
// ============================================================================

/// Source of client and request identifiers.
///
/// Implementations must never return the same request ID twice for the
/// lifetime of one generator.
pub trait IdGenerator: Send + Sync {
    /// Returns a new client ID. Called once per connection.
    fn client_id(&self) -> ClientId;

    /// Returns a new request ID. Called once per request without an explicit ID.
    fn request_id(&self) -> RequestId;
}

// ============================================================================
// UuidIds
// ============================================================================

/// Random identifiers backed by UUID v4.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn client_id(&self) -> ClientId {
        ClientId(format!("client_{}", Uuid::new_v4()))
    }

    fn request_id(&self) -> RequestId {
        RequestId(format!("req_{}", Uuid::new_v4()))
    }
}

// ============================================================================
// SequentialIds
// ============================================================================

/// Deterministic identifiers from a monotonic counter.
///
/// Client and request IDs share one counter, so no two IDs produced by the
/// same generator compare equal.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator whose first ID is numbered `start`.
    #[inline]
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    #[inline]
    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl IdGenerator for SequentialIds {
    fn client_id(&self) -> ClientId {
        ClientId(format!("client_{}", self.bump()))
    }

    fn request_id(&self) -> RequestId {
        RequestId(format!("req_{}", self.bump()))
    }
}

// ============================================================================
// Tests
// ============================================================================
