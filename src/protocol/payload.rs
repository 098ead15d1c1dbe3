//! Typed views of nested JSON payloads.
//!
//! Several responses carry a second JSON document inside the envelope's
//! `payload` string. These types parse it with [`Envelope::parse_payload`].
//!
//! [`Envelope::parse_payload`]: super::Envelope::parse_payload

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// VaultState
// ============================================================================

/// Payload of a `VAULT_STATE_UPDATE` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultState {
    /// Whether the service main loop is running.
    pub service_running: bool,

    /// Seconds since the service started.
    pub uptime_seconds: u64,

    /// Active profile, `null` when none is selected.
    #[serde(default)]
    pub active_profile: Option<ProfileSummary>,

    /// Folders of the active profile.
    #[serde(default)]
    pub folders: Vec<FolderInfo>,
}

impl VaultState {
    /// Keys every vault state payload must contain.
    pub const REQUIRED_KEYS: [&'static str; 4] = [
        "service_running",
        "uptime_seconds",
        "active_profile",
        "folders",
    ];

    /// Returns the required keys missing from a raw payload document.
    #[must_use]
    pub fn missing_keys(payload: &Value) -> Vec<&'static str> {
        Self::REQUIRED_KEYS
            .into_iter()
            .filter(|key| payload.get(*key).is_none())
            .collect()
    }
}

// ============================================================================
// FolderInfo
// ============================================================================

/// One protected folder as reported in a vault state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    /// Folder identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Whether the folder is currently locked.
    #[serde(default)]
    pub is_locked: bool,

    /// Path the folder was protected from.
    #[serde(default)]
    pub original_path: String,
}

// ============================================================================
// ProfileList
// ============================================================================

/// Payload of a `PROFILE_UPDATE` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileList {
    /// Known profiles.
    pub profiles: Vec<ProfileSummary>,
}

/// One vault profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Profile identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Creation time in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Any further fields the service includes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_vault_state_with_active_profile() {
        let payload = json!({
            "service_running": true,
            "uptime_seconds": 42,
            "active_profile": {"id": "p1", "name": "Work", "created_at": 1700000000},
            "folders": [
                {"id": "f1", "name": "docs", "is_locked": true, "original_path": "/home/u/docs"}
            ]
        });

        let state: VaultState = serde_json::from_value(payload).expect("parse");
        assert!(state.service_running);
        assert_eq!(state.uptime_seconds, 42);
        assert_eq!(state.active_profile.as_ref().map(|p| p.name.as_str()), Some("Work"));
        assert_eq!(state.folders.len(), 1);
        assert!(state.folders[0].is_locked);
    }

    #[test]
    fn test_vault_state_without_active_profile() {
        let payload = json!({
            "service_running": true,
            "uptime_seconds": 0,
            "active_profile": null,
            "folders": []
        });

        assert!(VaultState::missing_keys(&payload).is_empty());

        let state: VaultState = serde_json::from_value(payload).expect("parse");
        assert!(state.active_profile.is_none());
        assert!(state.folders.is_empty());
    }

    #[test]
    fn test_missing_keys() {
        let payload = json!({"service_running": true, "uptime_seconds": 5});
        assert_eq!(
            VaultState::missing_keys(&payload),
            vec!["active_profile", "folders"]
        );
    }

    #[test]
    fn test_profile_list_keeps_extra_fields() {
        let payload = r#"{"profiles":[{"id":"p1","name":"Work","created_at":1,"color":"blue"}]}"#;
        let list: ProfileList = serde_json::from_str(payload).expect("parse");

        assert_eq!(list.profiles.len(), 1);
        let profile = &list.profiles[0];
        assert_eq!(profile.id, "p1");
        assert_eq!(profile.created_at, Some(1));
        assert_eq!(profile.extra.get("color"), Some(&json!("blue")));
    }

    #[test]
    fn test_empty_profile_list() {
        let list: ProfileList = serde_json::from_str(r#"{"profiles":[]}"#).expect("parse");
        assert!(list.profiles.is_empty());
    }
}
