//! Role gate deciding whether a session may see a role-restricted page.

use serde::Serialize;

use crate::domain::Role;

/// Login page path, where anonymous visitors are sent.
pub const LOGIN_PATH: &str = "/";

/// What is known about the caller when a guarded page is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session.
    Anonymous,
    /// Signed in, profile still being fetched.
    ProfilePending,
    /// Signed in with a loaded profile.
    Authenticated(Role),
}

impl SessionState {
    /// Session state after a profile lookup. A failed or empty lookup
    /// counts as no profile, never as pending.
    pub fn from_lookup(signed_in: bool, role: Option<Role>) -> Self {
        match (signed_in, role) {
            (true, Some(role)) => Self::Authenticated(role),
            _ => Self::Anonymous,
        }
    }
}

/// Result of evaluating the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateOutcome {
    /// Show the guarded content.
    Render,
    /// Hold off deciding until the profile arrives.
    Loading,
    /// Send the caller elsewhere.
    Redirect { location: &'static str },
}

/// Decide access to a page that requires `required`.
///
/// | session                 | outcome                           |
/// |-------------------------|-----------------------------------|
/// | anonymous               | redirect to login                 |
/// | profile pending         | loading                           |
/// | role differs            | redirect to the caller's dashboard |
/// | role matches            | render                            |
pub fn evaluate(session: SessionState, required: Role) -> GateOutcome {
    match session {
        SessionState::Anonymous => GateOutcome::Redirect {
            location: LOGIN_PATH,
        },
        SessionState::ProfilePending => GateOutcome::Loading,
        SessionState::Authenticated(role) if role == required => GateOutcome::Render,
        SessionState::Authenticated(role) => GateOutcome::Redirect {
            location: role.dashboard_path(),
        },
    }
}
