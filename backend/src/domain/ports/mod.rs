//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters and
//! implemented by domain services. Driven ports (`*Provider`, `*Repository`,
//! `ObjectStore`) are called by services and implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod identity_provider;
mod object_store;
mod profile_repository;
mod report_repository;
mod report_review_command;
mod report_submission_command;
mod report_views_query;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use object_store::MockObjectStore;
pub use object_store::{
    ObjectPath, ObjectPathError, ObjectPayload, ObjectStore, ObjectStoreError, StoredBlob,
    StoredObject, content_type_for, photo_content_type,
};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use report_repository::{ReportRepository, ReportRepositoryError};
#[cfg(test)]
pub use report_review_command::MockReportReviewCommand;
pub use report_review_command::ReportReviewCommand;
#[cfg(test)]
pub use report_submission_command::MockReportSubmissionCommand;
pub use report_submission_command::ReportSubmissionCommand;
#[cfg(test)]
pub use report_views_query::MockReportViewsQuery;
pub use report_views_query::{RangeSelection, ReportListRequest, ReportViewsQuery};
