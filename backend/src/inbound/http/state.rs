//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, ObjectStore, ReportReviewCommand, ReportSubmissionCommand, ReportViewsQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub submissions: Arc<dyn ReportSubmissionCommand>,
    pub reviews: Arc<dyn ReportReviewCommand>,
    pub views: Arc<dyn ReportViewsQuery>,
    pub photos: Arc<dyn ObjectStore>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub submissions: Arc<dyn ReportSubmissionCommand>,
    pub reviews: Arc<dyn ReportReviewCommand>,
    pub views: Arc<dyn ReportViewsQuery>,
    /// Read side of photo storage, served under `/storage`.
    pub photos: Arc<dyn ObjectStore>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            submissions,
            reviews,
            views,
            photos,
        } = ports;
        Self {
            accounts,
            submissions,
            reviews,
            views,
            photos,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
