//! Browser route table and the navigation decision built on the role gate.

use serde::Serialize;

use crate::domain::session_gate::{GateOutcome, SessionState, evaluate};
use crate::domain::Role;

/// Pages of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Login,
    MuridDashboard,
    MuridReports,
    MuridReportForm,
    GuruDashboard,
    GuruReports,
    GuruReportDetail { id: String },
}

impl AppRoute {
    /// Match a browser path; `None` for anything outside the table.
    ///
    /// A single trailing slash is ignored.
    pub fn resolve(path: &str) -> Option<Self> {
        let trimmed = match path {
            "/" => "/",
            other => other.strip_suffix('/').unwrap_or(other),
        };
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [""] => Some(Self::Login),
            ["murid", "dashboard"] => Some(Self::MuridDashboard),
            ["murid", "laporan"] => Some(Self::MuridReports),
            ["murid", "laporan", "form"] => Some(Self::MuridReportForm),
            ["guru", "dashboard"] => Some(Self::GuruDashboard),
            ["guru", "laporan"] => Some(Self::GuruReports),
            ["guru", "laporan", id] if !id.is_empty() => Some(Self::GuruReportDetail {
                id: (*id).to_owned(),
            }),
            _ => None,
        }
    }

    /// Role needed to open the page; `None` for the login page.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Login => None,
            Self::MuridDashboard | Self::MuridReports | Self::MuridReportForm => Some(Role::Murid),
            Self::GuruDashboard | Self::GuruReports | Self::GuruReportDetail { .. } => {
                Some(Role::Guru)
            }
        }
    }

    /// Stable page name reported to clients.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::MuridDashboard => "murid_dashboard",
            Self::MuridReports => "murid_reports",
            Self::MuridReportForm => "murid_report_form",
            Self::GuruDashboard => "guru_dashboard",
            Self::GuruReports => "guru_reports",
            Self::GuruReportDetail { .. } => "guru_report_detail",
        }
    }
}

/// What the browser should do for a requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Navigation {
    Render { page: &'static str },
    Loading,
    Redirect { location: &'static str },
    NotFound,
}

/// Resolve `path` and apply the gate for `session`.
///
/// The login page renders for visitors without a profile and sends
/// signed-in users to their dashboard.
pub fn navigate(path: &str, session: SessionState) -> Navigation {
    let Some(route) = AppRoute::resolve(path) else {
        return Navigation::NotFound;
    };
    match (route.required_role(), session) {
        (None, SessionState::Authenticated(role)) => Navigation::Redirect {
            location: role.dashboard_path(),
        },
        (None, _) => Navigation::Render { page: route.name() },
        (Some(required), session) => match evaluate(session, required) {
            GateOutcome::Render => Navigation::Render { page: route.name() },
            GateOutcome::Loading => Navigation::Loading,
            GateOutcome::Redirect { location } => Navigation::Redirect { location },
        },
    }
}
