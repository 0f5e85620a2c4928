//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence layers, plus the services implementing the driving ports.
//! Types validate on construction so invalid values never reach a port.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifier.
//! - Profile, Role, ProfileId: signed-up accounts and their dashboards.
//! - Category, PhotoSet, PhotoPair: the fixed 5R before/after photo grid.
//! - Report, ReportStatus, ReportSummary: submitted lab reports.
//! - SubmissionDraft and the submission pipeline types.
//! - Report filters, session gating, and route resolution.

pub mod account_service;
pub mod app_route;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod error;
pub mod ports;
pub mod profile;
pub mod report;
pub mod report_filter;
pub mod report_service;
pub mod session_gate;
pub mod submission;
pub mod submission_service;
pub mod trace_id;

pub use self::account_service::AccountService;
pub use self::app_route::{AppRoute, Navigation, navigate};
pub use self::auth::{
    CredentialField, FieldErrors, LoginCredentials, PASSWORD_MIN, Registration, RegistrationInput,
};
pub use self::category::{Category, PhotoPair, PhotoSet, PhotoSide, UnknownCategory};
pub use self::dashboard::{LatestReport, StudentDashboard, TeacherDashboard};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::profile::{
    ClassLabel, DisplayName, Email, Profile, ProfileId, ProfileValidationError, Role,
};
pub use self::report::{
    PhotoLocations, Report, ReportDetail, ReportId, ReportQuery, ReportStatus, ReportSummary,
    ReportValidationError,
};
pub use self::report_filter::{
    DatePreset, DateRange, ReportFilter, StatusFilter, UnknownFilterValue, filter_reports,
};
pub use self::report_service::{REPORT_NOT_FOUND, ReportService};
pub use self::session_gate::{GateOutcome, LOGIN_PATH, SessionState};
pub use self::submission::{
    PhotoFileName, PhotoFileNameError, StagedPhoto, SubmissionDraft, SubmissionFailure,
    SubmissionPhase, SubmissionReceipt,
};
pub use self::submission_service::SubmissionService;
pub use self::trace_id::TraceId;
