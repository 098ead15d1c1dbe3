//! Diagnostic scenarios against a running vault service.
//!
//! Each scenario sends one request on a shared [`Session`] and checks the
//! reply against the service contract. A failing scenario is recorded and
//! the run continues with the next one.
//!
//! | Scenario | Request | Passes when |
//! |----------|---------|-------------|
//! | [`Scenario::Ping`] | `PING` / `"ping"` | reply is `PONG` |
//! | [`Scenario::VaultState`] | `GET_VAULT_STATE` | `VAULT_STATE_UPDATE` with all state keys |
//! | [`Scenario::Profiles`] | `GET_PROFILES` | `PROFILE_UPDATE` with a `profiles` list |
//! | [`Scenario::UnknownType`] | `INVALID_MESSAGE_TYPE` | reply is `ERROR_NOTIFICATION` |
//!
//! The unknown-type scenario only warns on a missing error reply: the
//! service may drop unrecognized types without answering.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::protocol::{MessageType, VaultState};
use crate::transport::Session;

// ============================================================================
// Constants
// ============================================================================

/// Type string the service is not expected to recognize.
pub const INVALID_MESSAGE_TYPE: &str = "INVALID_MESSAGE_TYPE";

/// Default deadline for the unknown-type scenario.
pub const DEFAULT_UNKNOWN_TYPE_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Scenario
// ============================================================================

/// One diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// `PING` answered with `PONG`.
    Ping,
    /// `GET_VAULT_STATE` answered with a full state document.
    VaultState,
    /// `GET_PROFILES` answered with a profile list.
    Profiles,
    /// Unrecognized type answered with `ERROR_NOTIFICATION`.
    UnknownType,
}

impl Scenario {
    /// All scenarios in run order.
    pub const ALL: [Scenario; 4] = [
        Scenario::Ping,
        Scenario::VaultState,
        Scenario::Profiles,
        Scenario::UnknownType,
    ];

    /// Returns a short human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ping => "Ping",
            Self::VaultState => "Get Vault State",
            Self::Profiles => "Get Profiles",
            Self::UnknownType => "Invalid Message",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Outcome Types
// ============================================================================

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Contract satisfied.
    Passed,
    /// Contract violated or request failed.
    Failed(String),
    /// Tolerated deviation.
    Warning(String),
}

/// One scenario with its status and any details worth printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Scenario that ran.
    pub scenario: Scenario,
    /// Its result.
    pub status: ScenarioStatus,
    /// Extra lines such as uptime or profile names.
    pub details: Vec<String>,
}

impl ScenarioOutcome {
    fn passed(scenario: Scenario, details: Vec<String>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Passed,
            details,
        }
    }

    fn failed(scenario: Scenario, reason: impl Into<String>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Failed(reason.into()),
            details: Vec::new(),
        }
    }

    fn warning(scenario: Scenario, reason: impl Into<String>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Warning(reason.into()),
            details: Vec::new(),
        }
    }

    /// Returns `true` if the scenario passed.
    #[inline]
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }

    /// Returns `true` if the scenario failed.
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ScenarioStatus::Failed(_))
    }
}

/// Outcomes of a diagnostic run, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// One outcome per scenario.
    pub outcomes: Vec<ScenarioOutcome>,
}

impl DiagnosticReport {
    /// Number of passed scenarios.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_passed()).count()
    }

    /// Number of failed scenarios.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Number of scenarios that ended with a warning.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.outcomes.len() - self.passed() - self.failed()
    }

    /// Returns the outcome for a scenario, if it ran.
    #[must_use]
    pub fn outcome(&self, scenario: Scenario) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.scenario == scenario)
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, outcome) in self.outcomes.iter().enumerate() {
            let line = match &outcome.status {
                ScenarioStatus::Passed => "[PASS]".to_string(),
                ScenarioStatus::Failed(reason) => format!("[FAIL] {reason}"),
                ScenarioStatus::Warning(reason) => format!("[WARN] {reason}"),
            };
            writeln!(f, "[{}] {}: {line}", index + 1, outcome.scenario)?;
            for detail in &outcome.details {
                writeln!(f, "    {detail}")?;
            }
        }
        write!(
            f,
            "{} passed, {} failed, {} warnings",
            self.passed(),
            self.failed(),
            self.warnings()
        )
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Runs every scenario in order on one session.
pub async fn run(session: &mut Session) -> DiagnosticReport {
    run_with_timeout(session, DEFAULT_UNKNOWN_TYPE_TIMEOUT).await
}

/// Runs every scenario, bounding the unknown-type scenario by `unknown_type_timeout`.
pub async fn run_with_timeout(
    session: &mut Session,
    unknown_type_timeout: Duration,
) -> DiagnosticReport {
    let mut report = DiagnosticReport::default();

    for scenario in Scenario::ALL {
        let outcome = run_scenario(session, scenario, unknown_type_timeout).await;
        match &outcome.status {
            ScenarioStatus::Passed => info!(%scenario, "Scenario passed"),
            ScenarioStatus::Failed(reason) => warn!(%scenario, %reason, "Scenario failed"),
            ScenarioStatus::Warning(reason) => warn!(%scenario, %reason, "Scenario warning"),
        }
        report.outcomes.push(outcome);
    }

    report
}

/// Runs a single scenario.
pub async fn run_scenario(
    session: &mut Session,
    scenario: Scenario,
    unknown_type_timeout: Duration,
) -> ScenarioOutcome {
    match scenario {
        Scenario::Ping => check_ping(session).await,
        Scenario::VaultState => check_vault_state(session).await,
        Scenario::Profiles => check_profiles(session).await,
        Scenario::UnknownType => check_unknown_type(session, unknown_type_timeout).await,
    }
}

async fn check_ping(session: &mut Session) -> ScenarioOutcome {
    let scenario = Scenario::Ping;
    match session.try_request(MessageType::Ping, "ping", None).await {
        Ok(reply) => match reply.expect_type(&MessageType::Pong) {
            Ok(_) => ScenarioOutcome::passed(scenario, Vec::new()),
            Err(e) => ScenarioOutcome::failed(scenario, e.to_string()),
        },
        Err(e) => ScenarioOutcome::failed(scenario, e.to_string()),
    }
}

async fn check_vault_state(session: &mut Session) -> ScenarioOutcome {
    let scenario = Scenario::VaultState;
    let state = match typed_reply(session, MessageType::GetVaultState).await {
        Ok(state) => state,
        Err(e) => return ScenarioOutcome::failed(scenario, e.to_string()),
    };

    let missing = VaultState::missing_keys(&state);
    if !missing.is_empty() {
        return ScenarioOutcome::failed(
            scenario,
            format!("state payload missing keys: {}", missing.join(", ")),
        );
    }

    let active_profile = state["active_profile"]
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("none");
    let folders = state["folders"].as_array().map_or(0, Vec::len);

    ScenarioOutcome::passed(
        scenario,
        vec![
            format!("Service running: {}", state["service_running"]),
            format!("Uptime: {} seconds", state["uptime_seconds"]),
            format!("Active profile: {active_profile}"),
            format!("Folders: {folders}"),
        ],
    )
}

async fn check_profiles(session: &mut Session) -> ScenarioOutcome {
    let scenario = Scenario::Profiles;
    let document = match typed_reply(session, MessageType::GetProfiles).await {
        Ok(document) => document,
        Err(e) => return ScenarioOutcome::failed(scenario, e.to_string()),
    };

    let Some(profiles) = document.get("profiles").and_then(Value::as_array) else {
        return ScenarioOutcome::failed(scenario, "payload has no profiles list");
    };

    let mut details = vec![format!("Found {} profile(s)", profiles.len())];
    details.extend(profiles.iter().map(|profile| {
        format!(
            "- {} (ID: {})",
            profile.get("name").and_then(Value::as_str).unwrap_or("Unknown"),
            profile.get("id").and_then(Value::as_str).unwrap_or("N/A"),
        )
    }));

    ScenarioOutcome::passed(scenario, details)
}

async fn check_unknown_type(session: &mut Session, deadline: Duration) -> ScenarioOutcome {
    let scenario = Scenario::UnknownType;
    let result = session
        .request_with_timeout(INVALID_MESSAGE_TYPE, "test", None, Some(deadline))
        .await;

    match result {
        Ok(reply) if reply.is_error() => ScenarioOutcome::passed(scenario, Vec::new()),
        Ok(reply) => ScenarioOutcome::warning(
            scenario,
            format!("expected ERROR_NOTIFICATION, got {}", reply.message_type),
        ),
        Err(e) => ScenarioOutcome::warning(scenario, format!("no error response: {e}")),
    }
}

/// Sends a request with an empty payload, checks the documented reply type
/// and returns the payload parsed as JSON.
async fn typed_reply(
    session: &mut Session,
    message_type: MessageType,
) -> Result<Value> {
    session.call(message_type, "").await?.payload_json()
}

// ============================================================================
// Tests
// ============================================================================
