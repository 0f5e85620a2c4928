//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::FixedOffset;
use mockable::DefaultClock;
use serde_json::{Value, json};
use url::Url;

use crate::domain::{AccountService, ReportService, SubmissionService};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{api_routes, storage};
use crate::outbound::memory::{MemoryAccounts, MemoryReports};
use crate::outbound::storage::MemoryObjectStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Real services over in-memory adapters.
pub struct MemoryHarness {
    pub state: HttpState,
    pub store: Arc<MemoryObjectStore>,
}

impl MemoryHarness {
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let accounts = Arc::new(MemoryAccounts::new());
        let reports = Arc::new(MemoryReports::new(Arc::clone(&accounts)));
        let store = Arc::new(MemoryObjectStore::new(
            Url::parse("http://localhost:8080/storage/").expect("base url"),
        ));
        let offset = FixedOffset::east_opt(7 * 3600).expect("offset");
        let views = Arc::new(ReportService::new(
            Arc::clone(&reports),
            Arc::clone(&accounts),
            clock.clone(),
            offset,
        ));
        let state = HttpState::new(HttpStatePorts {
            accounts: Arc::new(AccountService::new(
                Arc::clone(&accounts),
                Arc::clone(&accounts),
                clock.clone(),
            )),
            submissions: Arc::new(SubmissionService::new(
                Arc::clone(&store),
                Arc::clone(&reports),
                clock,
            )),
            reviews: views.clone(),
            views,
            photos: store.clone(),
        });
        Self { state, store }
    }

    /// App wired the way the server wires it, minus tracing.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .configure(api_routes),
            )
            .service(storage::serve_photo)
    }
}

/// Registration body for a student.
pub fn murid_registration(email: &str) -> Value {
    json!({
        "email": email,
        "password": "rahasia",
        "displayName": "Siti Rahmawati",
        "role": "MURID",
        "classLabel": "XI TKJ 2",
    })
}

/// Registration body for a teacher.
pub fn guru_registration(email: &str) -> Value {
    json!({
        "email": email,
        "password": "rahasia",
        "displayName": "Bu Ratna",
        "role": "GURU",
    })
}

/// Find the session cookie on a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
