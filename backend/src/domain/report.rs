//! Lab reports: ten photo locations plus a review status.
//!
//! A report only exists once every photo has been stored. After creation the
//! status is the sole mutable field and any teacher may overwrite it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ClassLabel, DisplayName, PhotoPair, PhotoSet, ProfileId};

/// Validation failures for report fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportValidationError {
    #[error("report id must be a valid UUID")]
    InvalidId,
    #[error("status must be DIPROSES, DITERIMA, or DITOLAK")]
    UnknownStatus,
}

/// Stable report identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportId(Uuid);

impl ReportId {
    /// Parse a report identifier from its hyphenated form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ReportValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ReportValidationError::InvalidId)
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ReportId> for String {
    fn from(value: ReportId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ReportId {
    type Error = ReportValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Review state of a report.
///
/// Every report starts as [`ReportStatus::Diproses`]; teachers may move it
/// between any two values, including back to processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Awaiting review.
    Diproses,
    /// Accepted by a teacher.
    Diterima,
    /// Rejected by a teacher.
    Ditolak,
}

impl ReportStatus {
    /// Status given to every newly created report.
    pub const INITIAL: ReportStatus = ReportStatus::Diproses;

    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Diproses,
        ReportStatus::Diterima,
        ReportStatus::Ditolak,
    ];

    /// Wire and storage spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Diproses => "DIPROSES",
            Self::Diterima => "DITERIMA",
            Self::Ditolak => "DITOLAK",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = ReportValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(ReportValidationError::UnknownStatus)
    }
}

/// Public URLs of the ten stored photos.
pub type PhotoLocations = PhotoSet<PhotoPair<String>>;

/// A persisted report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: ReportId,
    pub owner_id: ProfileId,
    pub submitted_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub photos: PhotoLocations,
}

/// List row: a report header joined with its owner's name and class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[schema(value_type = String, format = Uuid)]
    pub id: ReportId,
    #[schema(value_type = String, format = Uuid)]
    pub owner_id: ProfileId,
    #[schema(value_type = String, example = "Siti Rahmawati")]
    pub owner_name: DisplayName,
    #[schema(value_type = Option<String>, example = "XI TKJ 2")]
    pub owner_class: Option<ClassLabel>,
    pub submitted_at: DateTime<Utc>,
    pub status: ReportStatus,
}

/// Everything the review page shows for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    #[serde(flatten)]
    pub summary: ReportSummary,
    /// Category key to `{ before, after }` public URLs.
    #[schema(value_type = Object)]
    pub photos: PhotoLocations,
}

/// Row selection for report listings and counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub owner: Option<ProfileId>,
    pub status: Option<ReportStatus>,
}

impl ReportQuery {
    /// Every report in the school.
    pub fn all() -> Self {
        Self::default()
    }

    /// Reports submitted by one student.
    pub fn owned_by(owner: ProfileId) -> Self {
        Self {
            owner: Some(owner),
            status: None,
        }
    }

    /// Narrow to one status.
    pub fn with_status(mut self, status: Option<ReportStatus>) -> Self {
        self.status = status;
        self
    }
}
