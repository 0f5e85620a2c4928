//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use crate::domain::{Category, Error, FieldErrors, PhotoSide, UnknownFilterValue};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidFields,
    InvalidFilter,
    InvalidTimestamp,
    ConflictingRange,
    InvalidFileName,
    InvalidPhotoData,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidFields => "invalid_fields",
            ErrorCode::InvalidFilter => "invalid_filter",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::ConflictingRange => "conflicting_range",
            ErrorCode::InvalidFileName => "invalid_file_name",
            ErrorCode::InvalidPhotoData => "invalid_photo_data",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// Every form field problem at once, keyed by request field name under
/// `details.fields`. The headline message is the first problem found.
pub(crate) fn field_errors(errors: &FieldErrors) -> Error {
    let fields: Map<String, Value> = errors
        .iter()
        .map(|(field, message)| (field.as_str().to_owned(), Value::from(message)))
        .collect();
    let headline = errors.first_message().unwrap_or("Data tidak valid");
    Error::invalid_request(headline).with_details(json!({
        "fields": fields,
        "code": ErrorCode::InvalidFields.as_str(),
    }))
}

pub(crate) fn invalid_filter_error(field: FieldName, err: &UnknownFilterValue) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} has an unrecognised value"))
        .with_value(ErrorCode::InvalidFilter, err.0.clone())
}

pub(crate) fn conflicting_range_error() -> Error {
    ValidationError::new("range", "range cannot be combined with from/to")
        .with_code(ErrorCode::ConflictingRange)
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an RFC 3339 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

/// A photo slot whose payload could not be accepted.
pub(crate) fn invalid_photo_error(
    category: Category,
    side: PhotoSide,
    invalid_data: bool,
    reason: impl std::fmt::Display,
) -> Error {
    let code = if invalid_data {
        ErrorCode::InvalidPhotoData
    } else {
        ErrorCode::InvalidFileName
    };
    Error::invalid_request(format!(
        "Foto {} {} tidak valid: {reason}",
        category.label(),
        side.key()
    ))
    .with_details(json!({
        "category": category.key(),
        "side": side.key(),
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, &value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}
