//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod dashboard;
pub mod error;
mod guard;
pub mod health;
pub mod navigation;
pub mod reports;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod storage;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every handler served below `/api/v1`.
///
/// ```
/// use actix_web::{App, web};
/// use lab_reports::inbound::http::api_routes;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(navigation::resolve_navigation)
        .service(dashboard::student_dashboard)
        .service(dashboard::teacher_dashboard)
        .service(reports::submit_report)
        .service(reports::list_own_reports)
        .service(reports::list_all_reports)
        .service(reports::report_detail)
        .service(reports::update_report_status);
}
