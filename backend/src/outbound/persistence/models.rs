//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Category, ClassLabel, DisplayName, Email, PhotoLocations, PhotoPair, PhotoSet, Profile,
    ProfileId, Report, ReportId, ReportStatus, ReportSummary, Role,
};

use super::schema::{profiles, reports};

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub class_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProfileRow {
    /// Validate a row back into a domain profile.
    pub(crate) fn into_profile(self) -> Result<Profile, String> {
        let display_name = DisplayName::new(&self.display_name).map_err(|err| err.to_string())?;
        let role = self.role.parse::<Role>().map_err(|err| err.to_string())?;
        let class_label = self
            .class_label
            .map(ClassLabel::new)
            .transpose()
            .map_err(|err| err.to_string())?;
        let email = Email::new(&self.email).map_err(|err| err.to_string())?;
        Ok(Profile::new(
            ProfileId::from_uuid(self.id),
            display_name,
            role,
            class_label,
            email,
            self.created_at,
        ))
    }
}

/// Insertable struct for creating profile records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub class_label: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the reports table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReportRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
    pub ringkas_before: String,
    pub ringkas_after: String,
    pub rapi_before: String,
    pub rapi_after: String,
    pub resik_before: String,
    pub resik_after: String,
    pub rawat_before: String,
    pub rawat_after: String,
    pub rajin_before: String,
    pub rajin_after: String,
}

impl ReportRow {
    fn pair(&self, category: Category) -> PhotoPair<String> {
        let (before, after) = match category {
            Category::Ringkas => (&self.ringkas_before, &self.ringkas_after),
            Category::Rapi => (&self.rapi_before, &self.rapi_after),
            Category::Resik => (&self.resik_before, &self.resik_after),
            Category::Rawat => (&self.rawat_before, &self.rawat_after),
            Category::Rajin => (&self.rajin_before, &self.rajin_after),
        };
        PhotoPair {
            before: before.clone(),
            after: after.clone(),
        }
    }

    pub(crate) fn photos(&self) -> PhotoLocations {
        PhotoSet::from_fn(|category| self.pair(category))
    }

    pub(crate) fn status(&self) -> Result<ReportStatus, String> {
        self.status
            .parse::<ReportStatus>()
            .map_err(|err| err.to_string())
    }

    /// Join with the owner's profile into a list row.
    pub(crate) fn summarise(&self, owner: &ProfileRow) -> Result<ReportSummary, String> {
        let owner_name = DisplayName::new(&owner.display_name).map_err(|err| err.to_string())?;
        let owner_class = owner
            .class_label
            .as_deref()
            .map(ClassLabel::new)
            .transpose()
            .map_err(|err| err.to_string())?;
        Ok(ReportSummary {
            id: ReportId::from_uuid(self.id),
            owner_id: ProfileId::from_uuid(self.owner_id),
            owner_name,
            owner_class,
            submitted_at: self.submitted_at,
            status: self.status()?,
        })
    }
}

/// Insertable struct for creating report records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reports)]
pub(crate) struct NewReportRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub status: &'a str,
    pub ringkas_before: &'a str,
    pub ringkas_after: &'a str,
    pub rapi_before: &'a str,
    pub rapi_after: &'a str,
    pub resik_before: &'a str,
    pub resik_after: &'a str,
    pub rawat_before: &'a str,
    pub rawat_after: &'a str,
    pub rajin_before: &'a str,
    pub rajin_after: &'a str,
}

fn urls(photos: &PhotoLocations, category: Category) -> (&str, &str) {
    let pair = photos.get(category);
    (pair.before.as_str(), pair.after.as_str())
}

impl<'a> From<&'a Report> for NewReportRow<'a> {
    fn from(report: &'a Report) -> Self {
        let (ringkas_before, ringkas_after) = urls(&report.photos, Category::Ringkas);
        let (rapi_before, rapi_after) = urls(&report.photos, Category::Rapi);
        let (resik_before, resik_after) = urls(&report.photos, Category::Resik);
        let (rawat_before, rawat_after) = urls(&report.photos, Category::Rawat);
        let (rajin_before, rajin_after) = urls(&report.photos, Category::Rajin);
        Self {
            id: *report.id.as_uuid(),
            owner_id: *report.owner_id.as_uuid(),
            submitted_at: report.submitted_at,
            status: report.status.as_str(),
            ringkas_before,
            ringkas_after,
            rapi_before,
            rapi_after,
            resik_before,
            resik_after,
            rawat_before,
            rawat_after,
            rajin_before,
            rajin_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn report() -> Report {
        Report {
            id: ReportId::random(),
            owner_id: ProfileId::random(),
            submitted_at: Utc::now(),
            status: ReportStatus::Diterima,
            photos: PhotoSet::from_fn(|category| PhotoPair {
                before: format!("{}-b", category.key()),
                after: format!("{}-a", category.key()),
            }),
        }
    }

    #[rstest]
    fn insert_row_places_each_url_in_its_column() {
        let report = report();
        let row = NewReportRow::from(&report);
        assert_eq!(row.resik_before, "resik-b");
        assert_eq!(row.rajin_after, "rajin-a");
        assert_eq!(row.status, "DITERIMA");
    }

    #[rstest]
    fn read_row_rebuilds_photo_set() {
        let report = report();
        let new_row = NewReportRow::from(&report);
        let row = ReportRow {
            id: new_row.id,
            owner_id: new_row.owner_id,
            submitted_at: new_row.submitted_at,
            status: new_row.status.to_owned(),
            ringkas_before: new_row.ringkas_before.to_owned(),
            ringkas_after: new_row.ringkas_after.to_owned(),
            rapi_before: new_row.rapi_before.to_owned(),
            rapi_after: new_row.rapi_after.to_owned(),
            resik_before: new_row.resik_before.to_owned(),
            resik_after: new_row.resik_after.to_owned(),
            rawat_before: new_row.rawat_before.to_owned(),
            rawat_after: new_row.rawat_after.to_owned(),
            rajin_before: new_row.rajin_before.to_owned(),
            rajin_after: new_row.rajin_after.to_owned(),
        };
        assert_eq!(row.photos(), report.photos);
        assert_eq!(row.status(), Ok(ReportStatus::Diterima));
    }

    #[rstest]
    fn profile_row_with_unknown_role_is_rejected() {
        let row = ProfileRow {
            id: Uuid::new_v4(),
            email: "a@b.id".into(),
            password_hash: String::new(),
            display_name: "Budi".into(),
            role: "ADMIN".into(),
            class_label: None,
            created_at: Utc::now(),
        };
        assert!(row.into_profile().is_err());
    }
}
