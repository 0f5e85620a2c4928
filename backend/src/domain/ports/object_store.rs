//! Port for durable photo storage.
//!
//! Objects are written once under a caller-chosen relative path and never
//! replaced: adapters must refuse to overwrite an existing object. Readers
//! reach stored photos through the public URL the adapter hands back.

use std::fmt;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by object store adapters.
    pub enum ObjectStoreError {
        /// An object already exists at the target path.
        AlreadyExists { path: String } => "object already exists: {path}",
        /// Writing the object failed.
        Write { path: String, message: String } => "failed to store {path}: {message}",
        /// Reading the object failed for a reason other than absence.
        Read { path: String, message: String } => "failed to read {path}: {message}",
        /// The store cannot build a public URL for the object.
        PublicUrl { path: String, message: String } =>
            "failed to resolve public URL for {path}: {message}",
    }
}

/// Validation failures for [`ObjectPath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectPathError {
    #[error("object path must not be empty")]
    Empty,
    #[error("object path must be relative")]
    Absolute,
    #[error("object path contains an invalid segment: {segment:?}")]
    InvalidSegment { segment: String },
}

/// Relative, slash-separated location of an object inside a store.
///
/// ## Invariants
/// - Non-empty and does not start with `/`.
/// - No segment is empty, `.`, or `..`, and none contains a backslash or a
///   control character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn new(path: impl Into<String>) -> Result<Self, ObjectPathError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ObjectPathError::Empty);
        }
        if path.starts_with('/') {
            return Err(ObjectPathError::Absolute);
        }
        if let Some(segment) = path.split('/').find(|segment| !segment_is_valid(segment)) {
            return Err(ObjectPathError::InvalidSegment {
                segment: segment.to_owned(),
            });
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Last segment, used to guess the media type.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(self.0.as_str())
    }
}

fn segment_is_valid(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains('\\')
        && !segment.chars().any(char::is_control)
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Bytes handed to the store along with their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPayload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Receipt for a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: ObjectPath,
    pub size: u64,
}

/// Object contents returned by [`ObjectStore::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Write-once photo storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `payload` at `path`, failing with
    /// [`ObjectStoreError::AlreadyExists`] when the path is taken.
    async fn put(
        &self,
        path: &ObjectPath,
        payload: ObjectPayload,
    ) -> Result<StoredObject, ObjectStoreError>;

    /// Public URL under which a stored object can be fetched.
    fn public_url(&self, stored: &StoredObject) -> Result<String, ObjectStoreError>;

    /// Fetch an object; `None` when nothing is stored at `path`.
    async fn get(&self, path: &ObjectPath) -> Result<Option<StoredBlob>, ObjectStoreError>;
}

/// Image media types photos may be stored and served as, by extension.
const IMAGE_TYPES: [(&str, &str); 7] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("bmp", "image/bmp"),
];

const FALLBACK_TYPE: &str = "application/octet-stream";

/// Media type for a file name, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    IMAGE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map_or(FALLBACK_TYPE, |&(_, media)| media)
}

/// Media type a photo is stored under.
///
/// A declared type is kept only when it names one of the known image types;
/// anything else is replaced by the guess from `file_name`.
pub fn photo_content_type(declared: Option<&str>, file_name: &str) -> &'static str {
    let declared = declared
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());
    declared
        .and_then(|value| {
            IMAGE_TYPES
                .iter()
                .map(|(_, media)| *media)
                .find(|media| *media == value)
        })
        .unwrap_or_else(|| content_type_for(file_name))
}
