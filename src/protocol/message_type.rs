//! Message type vocabulary.
//!
//! The `type` field of every envelope is a string from a fixed,
//! service-defined vocabulary. Unrecognized strings are preserved as
//! [`MessageType::Other`] and sent verbatim, so a caller can probe the
//! service with arbitrary types.
//!
//! # Request/Response Pairs
//!
//! | Request | Expected Response |
//! |---------|-------------------|
//! | `PING` | `PONG` |
//! | `GET_VAULT_STATE` | `VAULT_STATE_UPDATE` |
//! | `GET_PROFILES` | `PROFILE_UPDATE` |
//! | anything unrecognized | `ERROR_NOTIFICATION` |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// MessageType
// ============================================================================

/// Kind of message carried in an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    // Service -> client
    /// Vault state snapshot.
    VaultStateUpdate,
    /// Folder lock/unlock status changed.
    FolderStatusUpdate,
    /// Profile list snapshot.
    ProfileUpdate,
    /// Error reported by the service.
    ErrorNotification,

    // Client -> service
    /// Request the current vault state.
    GetVaultState,
    /// Request the profile list.
    GetProfiles,
    /// Add a folder to the vault.
    AddFolder,
    /// Remove a folder from the vault.
    RemoveFolder,
    /// Unlock folders with a password.
    UnlockFolders,
    /// Lock folders.
    LockFolders,
    /// Create a profile.
    CreateProfile,
    /// Delete a profile.
    DeleteProfile,
    /// Password entered through the client.
    PasswordInput,

    // Bidirectional
    /// Liveness probe.
    Ping,
    /// Liveness reply.
    Pong,
    /// Shutdown request or acknowledgment.
    Shutdown,

    /// The service's own placeholder for an unparseable type.
    Unknown,
    /// Any string outside the vocabulary.
    Other(String),
}

impl MessageType {
    /// Returns the wire string for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::VaultStateUpdate => "VAULT_STATE_UPDATE",
            Self::FolderStatusUpdate => "FOLDER_STATUS_UPDATE",
            Self::ProfileUpdate => "PROFILE_UPDATE",
            Self::ErrorNotification => "ERROR_NOTIFICATION",
            Self::GetVaultState => "GET_VAULT_STATE",
            Self::GetProfiles => "GET_PROFILES",
            Self::AddFolder => "ADD_FOLDER",
            Self::RemoveFolder => "REMOVE_FOLDER",
            Self::UnlockFolders => "UNLOCK_FOLDERS",
            Self::LockFolders => "LOCK_FOLDERS",
            Self::CreateProfile => "CREATE_PROFILE",
            Self::DeleteProfile => "DELETE_PROFILE",
            Self::PasswordInput => "PASSWORD_INPUT",
            Self::Ping => "PING",
            Self::Pong => "PONG",
            Self::Shutdown => "SHUTDOWN",
            Self::Unknown => "UNKNOWN",
            Self::Other(other) => other,
        }
    }

    /// Returns the response type the service is documented to send back.
    ///
    /// Returns `None` for types that are themselves responses or whose reply
    /// is not part of the documented contract.
    #[must_use]
    pub fn expected_response(&self) -> Option<MessageType> {
        match self {
            Self::Ping => Some(Self::Pong),
            Self::GetVaultState => Some(Self::VaultStateUpdate),
            Self::GetProfiles => Some(Self::ProfileUpdate),
            Self::Other(_) => Some(Self::ErrorNotification),
            _ => None,
        }
    }

    /// Returns `true` for types the service sends as replies or notifications.
    #[inline]
    #[must_use]
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Self::VaultStateUpdate
                | Self::FolderStatusUpdate
                | Self::ProfileUpdate
                | Self::ErrorNotification
                | Self::Pong
        )
    }
}

impl From<&str> for MessageType {
    fn from(value: &str) -> Self {
        match value {
            "VAULT_STATE_UPDATE" => Self::VaultStateUpdate,
            "FOLDER_STATUS_UPDATE" => Self::FolderStatusUpdate,
            "PROFILE_UPDATE" => Self::ProfileUpdate,
            "ERROR_NOTIFICATION" => Self::ErrorNotification,
            "GET_VAULT_STATE" => Self::GetVaultState,
            "GET_PROFILES" => Self::GetProfiles,
            "ADD_FOLDER" => Self::AddFolder,
            "REMOVE_FOLDER" => Self::RemoveFolder,
            "UNLOCK_FOLDERS" => Self::UnlockFolders,
            "LOCK_FOLDERS" => Self::LockFolders,
            "CREATE_PROFILE" => Self::CreateProfile,
            "DELETE_PROFILE" => Self::DeleteProfile,
            "PASSWORD_INPUT" => Self::PasswordInput,
            "PING" => Self::Ping,
            "PONG" => Self::Pong,
            "SHUTDOWN" => Self::Shutdown,
            "UNKNOWN" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for MessageType {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<MessageType> for String {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
