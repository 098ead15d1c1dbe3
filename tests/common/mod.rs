//! In-process mock of the vault service for integration tests.
//!
//! Binds a Unix socket inside a temporary directory and answers each
//! request frame the way the real service does.

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;
use vault_ipc::protocol::envelope;
use vault_ipc::{Envelope, Framer, MessageType};

// ============================================================================
// Types
// ============================================================================

/// How the mock treats types it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownTypes {
    /// Reply with `ERROR_NOTIFICATION`.
    Reject,
    /// Send nothing back.
    Ignore,
}

/// A running mock service.
pub struct MockVault {
    _dir: TempDir,
    path: PathBuf,
    handle: JoinHandle<()>,
}

impl MockVault {
    /// Starts a mock that rejects unknown types and knows one profile.
    pub fn start() -> Self {
        Self::start_with(UnknownTypes::Reject, vec![("p1", "Work")])
    }

    /// Starts a mock with explicit behavior and profile set.
    pub fn start_with(unknown: UnknownTypes, profiles: Vec<(&str, &str)>) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("phantom-vault-test.sock");
        let listener = UnixListener::bind(&path).expect("bind");

        let profiles: Vec<(String, String)> = profiles
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();

        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(serve(stream, unknown, profiles.clone()));
            }
        });

        Self {
            _dir: dir,
            path,
            handle,
        }
    }

    /// Returns the socket path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MockVault {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// Service Logic
// ============================================================================

async fn serve(mut stream: UnixStream, unknown: UnknownTypes, profiles: Vec<(String, String)>) {
    let framer = Framer::default();

    while let Ok(body) = framer.read(&mut stream).await {
        let Ok(request) = envelope::decode(&body) else {
            continue;
        };

        let Some(reply) = respond(&request, unknown, &profiles) else {
            continue;
        };

        let bytes = envelope::encode(&reply).expect("encode reply");
        if framer.write(&mut stream, &bytes).await.is_err() {
            break;
        }
    }
}

fn respond(
    request: &Envelope,
    unknown: UnknownTypes,
    profiles: &[(String, String)],
) -> Option<Envelope> {
    let profile_docs: Vec<_> = profiles
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name, "created_at": 1_700_000_000}))
        .collect();

    match &request.message_type {
        MessageType::Ping => Some(request.reply(MessageType::Pong, "pong")),
        MessageType::GetVaultState => {
            let state = json!({
                "service_running": true,
                "uptime_seconds": 42,
                "active_profile": profile_docs.first().cloned(),
                "folders": [
                    {"id": "f1", "name": "docs", "is_locked": true, "original_path": "/home/u/docs"}
                ],
            });
            Some(request.reply(MessageType::VaultStateUpdate, state.to_string()))
        }
        MessageType::GetProfiles => {
            let list = json!({ "profiles": profile_docs });
            Some(request.reply(MessageType::ProfileUpdate, list.to_string()))
        }
        other => match unknown {
            UnknownTypes::Reject => Some(request.reply(
                MessageType::ErrorNotification,
                format!("Unknown message type: {other}"),
            )),
            UnknownTypes::Ignore => None,
        },
    }
}
