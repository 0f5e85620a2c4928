//! Profiles: who a signed-in account is and which side of the school it sits on.
//!
//! A profile is written once at registration and never edited afterwards.
//! Validation messages on the user-facing fields are Indonesian because they
//! are rendered inline next to the registration form inputs.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation failures for profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptyId,
    InvalidId,
    DisplayNameTooShort { min: usize },
    DisplayNameTooLong { max: usize },
    InvalidEmail,
    MissingClassLabel,
    ClassLabelTooLong { max: usize },
    UnknownRole,
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "profile id must not be empty"),
            Self::InvalidId => write!(f, "profile id must be a valid UUID"),
            Self::DisplayNameTooShort { min } => write!(f, "Nama minimal {min} karakter"),
            Self::DisplayNameTooLong { max } => write!(f, "Nama maksimal {max} karakter"),
            Self::InvalidEmail => write!(f, "Email tidak valid"),
            Self::MissingClassLabel => write!(f, "Kelas wajib diisi untuk Murid"),
            Self::ClassLabelTooLong { max } => write!(f, "Kelas maksimal {max} karakter"),
            Self::UnknownRole => write!(f, "Peran harus GURU atau MURID"),
        }
    }
}

impl std::error::Error for ProfileValidationError {}

/// Stable profile identifier, shared with the identity record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId(Uuid, String);

impl ProfileId {
    /// Validate and construct a [`ProfileId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ProfileValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`ProfileId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, ProfileValidationError> {
        if id.is_empty() {
            return Err(ProfileValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(ProfileValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| ProfileValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for ProfileId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ProfileId> for String {
    fn from(value: ProfileId) -> Self {
        value.1
    }
}

impl TryFrom<String> for ProfileId {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Minimum display name length in characters, after trimming.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum display name length in characters, after trimming. Matches the
/// width of the `profiles.display_name` column.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Person's name as shown on dashboards and report listings (`nama`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim and validate a display name.
    pub fn new(display_name: impl AsRef<str>) -> Result<Self, ProfileValidationError> {
        let trimmed = display_name.as_ref().trim();
        let length = trimmed.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(ProfileValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(ProfileValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum class label length in characters.
pub const CLASS_LABEL_MAX: usize = 32;

/// Class a student belongs to (`kelas`), e.g. "XI TKJ 2".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Trim and validate a class label.
    pub fn new(label: impl AsRef<str>) -> Result<Self, ProfileValidationError> {
        let trimmed = label.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProfileValidationError::MissingClassLabel);
        }
        if trimmed.chars().count() > CLASS_LABEL_MAX {
            return Err(ProfileValidationError::ClassLabelTooLong {
                max: CLASS_LABEL_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ClassLabel {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ClassLabel> for String {
    fn from(value: ClassLabel) -> Self {
        value.0
    }
}

impl TryFrom<String> for ClassLabel {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only: one `@`, no whitespace, a dot in the domain part.
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Sign-in address, trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, ProfileValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(ProfileValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Which side of the classroom an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Teacher: reviews every report and sets its status.
    Guru,
    /// Student: submits reports and sees only their own.
    Murid,
}

impl Role {
    /// Wire and storage spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guru => "GURU",
            Self::Murid => "MURID",
        }
    }

    /// Landing page after login for this role.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Self::Guru => "/guru/dashboard",
            Self::Murid => "/murid/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProfileValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GURU" => Ok(Self::Guru),
            "MURID" => Ok(Self::Murid),
            _ => Err(ProfileValidationError::UnknownRole),
        }
    }
}

/// A registered account's public profile.
///
/// ## Invariants
/// - Students registered through [`crate::domain::Registration`] always carry
///   a class label; teachers never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: ProfileId,
    #[schema(value_type = String, example = "Siti Rahmawati")]
    display_name: DisplayName,
    role: Role,
    #[schema(value_type = Option<String>, example = "XI TKJ 2")]
    class_label: Option<ClassLabel>,
    #[schema(value_type = String, example = "siti@sekolah.sch.id")]
    email: Email,
    created_at: DateTime<Utc>,
}

impl Profile {
    /// Assemble a profile from already-validated parts.
    pub fn new(
        id: ProfileId,
        display_name: DisplayName,
        role: Role,
        class_label: Option<ClassLabel>,
        email: Email,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            display_name,
            role,
            class_label,
            email,
            created_at,
        }
    }

    pub fn id(&self) -> &ProfileId {
        &self.id
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn class_label(&self) -> Option<&ClassLabel> {
        self.class_label.as_ref()
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
