//! Staging area and pipeline vocabulary for report submissions.
//!
//! A [`SubmissionDraft`] collects up to ten photos. Nothing leaves the draft
//! until every category has both halves; only then does the submission
//! service upload them, in category order, before writing the report.

use std::fmt;

use serde::Serialize;

use crate::domain::ports::{ObjectPath, ObjectPathError};
use crate::domain::{Category, Error, PhotoPair, PhotoSet, PhotoSide, ProfileId, Report};

/// Maximum photo file name length in bytes.
pub const PHOTO_FILE_NAME_MAX: usize = 200;

/// Validation failures for [`PhotoFileName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoFileNameError {
    #[error("file name must not be empty")]
    Empty,
    #[error("file name must be at most {max} bytes")]
    TooLong { max: usize },
    #[error("file name must not contain path separators or control characters")]
    InvalidCharacters,
}

/// Original file name of an uploaded photo, safe to embed in a storage path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFileName(String);

impl PhotoFileName {
    pub fn new(name: impl Into<String>) -> Result<Self, PhotoFileNameError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PhotoFileNameError::Empty);
        }
        if name.len() > PHOTO_FILE_NAME_MAX {
            return Err(PhotoFileNameError::TooLong {
                max: PHOTO_FILE_NAME_MAX,
            });
        }
        if name == "."
            || name == ".."
            || name.contains(['/', '\\'])
            || name.chars().any(char::is_control)
        {
            return Err(PhotoFileNameError::InvalidCharacters);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for PhotoFileName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhotoFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A photo picked by the student but not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPhoto {
    pub file_name: PhotoFileName,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Slots of one category: each side may still be empty.
pub type DraftSlots = PhotoPair<Option<StagedPhoto>>;

/// Photos being collected for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    slots: PhotoSet<DraftSlots>,
}

impl SubmissionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `photo` into a slot, dropping whatever was there.
    pub fn stage(&mut self, category: Category, side: PhotoSide, photo: StagedPhoto) {
        *self.slots.get_mut(category).get_mut(side) = Some(photo);
    }

    /// Empty a slot.
    pub fn remove(&mut self, category: Category, side: PhotoSide) {
        *self.slots.get_mut(category).get_mut(side) = None;
    }

    pub fn slot(&self, category: Category, side: PhotoSide) -> Option<&StagedPhoto> {
        self.slots.get(category).get(side).as_ref()
    }

    /// Number of filled slots.
    pub fn staged_count(&self) -> usize {
        self.slots
            .iter()
            .map(|(_, pair)| usize::from(pair.before.is_some()) + usize::from(pair.after.is_some()))
            .sum()
    }

    /// First category, in fixed order, lacking either half.
    pub fn first_incomplete(&self) -> Option<Category> {
        self.slots
            .iter()
            .find(|(_, pair)| pair.before.is_none() || pair.after.is_none())
            .map(|(category, _)| category)
    }

    /// Check completeness without consuming the draft.
    pub fn validate(&self) -> Result<(), Error> {
        match self.first_incomplete() {
            Some(category) => Err(incomplete_submission_error(category)),
            None => Ok(()),
        }
    }

    /// Turn a complete draft into ten staged photos; hands the draft back
    /// untouched when a pair is missing.
    pub fn into_complete(self) -> Result<PhotoSet<PhotoPair<StagedPhoto>>, (Self, Category)> {
        if let Some(category) = self.first_incomplete() {
            return Err((self, category));
        }
        let mut slots = self.slots;
        PhotoSet::try_from_fn(|category| {
            let pair = slots.get_mut(category);
            match (pair.before.take(), pair.after.take()) {
                (Some(before), Some(after)) => Ok(PhotoPair { before, after }),
                _ => Err(category),
            }
        })
        .map_err(|category| (Self::default(), category))
    }
}

/// User-facing message for a category missing a photo.
pub fn incomplete_submission_error(category: Category) -> Error {
    Error::invalid_request(format!(
        "Mohon lengkapi foto Before dan After untuk {}",
        category.label()
    ))
    .with_details(serde_json::json!({
        "category": category.key(),
        "code": "incomplete_submission",
    }))
}

/// Deterministic storage location of one photo:
/// `{owner}/{millis}/{category}_{side}_{file name}`.
pub fn storage_path(
    owner: &ProfileId,
    timestamp_millis: i64,
    category: Category,
    side: PhotoSide,
    file_name: &PhotoFileName,
) -> Result<ObjectPath, ObjectPathError> {
    ObjectPath::new(format!(
        "{owner}/{timestamp_millis}/{}_{}_{file_name}",
        category.key(),
        side.key()
    ))
}

/// Where a submission is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionPhase {
    Collecting,
    Validating,
    Uploading,
    Persisting,
    Done,
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Collecting => "collecting",
            Self::Validating => "validating",
            Self::Uploading => "uploading",
            Self::Persisting => "persisting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A submission that stopped before the report was written.
#[derive(Debug)]
pub struct SubmissionFailure {
    /// Phase in which the pipeline failed.
    pub phase: SubmissionPhase,
    pub error: Error,
    /// Objects already stored when the pipeline stopped. They are left in
    /// place.
    pub orphaned: Vec<ObjectPath>,
    /// The untouched draft, returned when validation rejected it.
    pub draft: Option<SubmissionDraft>,
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "submission failed while {}: {}", self.phase, self.error)
    }
}

impl std::error::Error for SubmissionFailure {}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub report: Report,
    /// Page the student lands on afterwards.
    pub redirect_to: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    fn photo(name: &str) -> StagedPhoto {
        StagedPhoto {
            file_name: PhotoFileName::new(name).expect("valid file name"),
            content_type: Some("image/jpeg".into()),
            bytes: name.as_bytes().to_vec(),
        }
    }

    #[fixture]
    fn full_draft() -> SubmissionDraft {
        let mut draft = SubmissionDraft::new();
        for category in Category::ALL {
            for side in PhotoSide::ALL {
                draft.stage(category, side, photo(&format!("{category}_{side}.jpg")));
            }
        }
        draft
    }

    #[rstest]
    fn staging_replaces_previous_photo() {
        let mut draft = SubmissionDraft::new();
        draft.stage(Category::Rapi, PhotoSide::Before, photo("lama.jpg"));
        draft.stage(Category::Rapi, PhotoSide::Before, photo("baru.jpg"));
        let staged = draft
            .slot(Category::Rapi, PhotoSide::Before)
            .expect("slot filled");
        assert_eq!(staged.file_name.as_ref(), "baru.jpg");
        assert_eq!(draft.staged_count(), 1);
    }

    #[rstest]
    fn removing_returns_slot_to_empty(mut full_draft: SubmissionDraft) {
        full_draft.remove(Category::Rawat, PhotoSide::After);
        assert!(full_draft.slot(Category::Rawat, PhotoSide::After).is_none());
        assert_eq!(full_draft.staged_count(), 9);
        assert_eq!(full_draft.first_incomplete(), Some(Category::Rawat));
    }

    #[rstest]
    fn first_missing_pair_follows_category_order() {
        let mut draft = SubmissionDraft::new();
        draft.stage(Category::Ringkas, PhotoSide::Before, photo("a.jpg"));
        draft.stage(Category::Ringkas, PhotoSide::After, photo("b.jpg"));
        draft.stage(Category::Resik, PhotoSide::Before, photo("c.jpg"));
        let error = draft.validate().expect_err("draft incomplete");
        assert_eq!(
            error.message(),
            "Mohon lengkapi foto Before dan After untuk Rapi"
        );
    }

    #[rstest]
    fn incomplete_draft_is_handed_back_untouched(mut full_draft: SubmissionDraft) {
        full_draft.remove(Category::Rajin, PhotoSide::Before);
        let before = full_draft.clone();
        let (returned, category) = full_draft.into_complete().expect_err("incomplete");
        assert_eq!(category, Category::Rajin);
        assert_eq!(returned, before);
    }

    #[rstest]
    fn complete_draft_yields_every_pair(full_draft: SubmissionDraft) {
        let photos = full_draft.into_complete().expect("complete");
        assert_eq!(
            photos.get(Category::Resik).after.file_name.as_ref(),
            "resik_after.jpg"
        );
    }

    #[rstest]
    fn storage_path_is_deterministic() {
        let owner = ProfileId::from_uuid(Uuid::nil());
        let name = PhotoFileName::new("meja kerja.jpg").expect("valid file name");
        let path = storage_path(&owner, 1_710_460_800_000, Category::Ringkas, PhotoSide::Before, &name)
            .expect("valid path");
        assert_eq!(
            path.as_str(),
            "00000000-0000-0000-0000-000000000000/1710460800000/ringkas_before_meja kerja.jpg"
        );
    }

    #[rstest]
    #[case("", PhotoFileNameError::Empty)]
    #[case("..", PhotoFileNameError::InvalidCharacters)]
    #[case("a/b.jpg", PhotoFileNameError::InvalidCharacters)]
    #[case("a\\b.jpg", PhotoFileNameError::InvalidCharacters)]
    fn file_name_rejects_path_tricks(#[case] input: &str, #[case] expected: PhotoFileNameError) {
        assert_eq!(PhotoFileName::new(input), Err(expected));
    }
}
