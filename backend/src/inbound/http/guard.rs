//! Role gate for API endpoints.
//!
//! Resolves the session's profile and applies [`evaluate`]. Callers without a
//! usable profile get `401` pointing at the login page; callers with the
//! wrong role get `403` pointing at their own dashboard.

use serde_json::json;
use tracing::warn;

use crate::domain::ports::AccountCommand;
use crate::domain::session_gate::evaluate;
use crate::domain::{Error, GateOutcome, LOGIN_PATH, Profile, Role, SessionState};

use super::session::SessionContext;

pub(crate) fn login_required() -> Error {
    Error::unauthorized("Silakan login terlebih dahulu").with_details(json!({
        "redirect": LOGIN_PATH,
        "code": "login_required",
    }))
}

fn wrong_role(location: &'static str) -> Error {
    Error::forbidden("Halaman ini tidak tersedia untuk peran Anda").with_details(json!({
        "redirect": location,
        "code": "wrong_role",
    }))
}

/// Profile behind the session, if any.
///
/// A failed lookup counts as "no profile" and is logged rather than
/// surfaced.
pub(crate) async fn current_profile(
    session: &SessionContext,
    accounts: &dyn AccountCommand,
) -> Result<Option<Profile>, Error> {
    let Some(id) = session.profile_id()? else {
        return Ok(None);
    };
    match accounts.find_profile(&id).await {
        Ok(profile) => Ok(profile),
        Err(error) => {
            warn!(profile_id = %id, error = %error, "profile lookup failed; treating as signed out");
            Ok(None)
        }
    }
}

/// Gate state for the session.
pub(crate) async fn session_state(
    session: &SessionContext,
    accounts: &dyn AccountCommand,
) -> Result<SessionState, Error> {
    let signed_in = session.profile_id()?.is_some();
    let profile = current_profile(session, accounts).await?;
    Ok(SessionState::from_lookup(
        signed_in,
        profile.as_ref().map(Profile::role),
    ))
}

/// Require a signed-in caller holding `required`.
pub(crate) async fn require_role(
    session: &SessionContext,
    accounts: &dyn AccountCommand,
    required: Role,
) -> Result<Profile, Error> {
    let profile = current_profile(session, accounts).await?;
    let state = SessionState::from_lookup(true, profile.as_ref().map(Profile::role));
    match evaluate(state, required) {
        GateOutcome::Render => profile.ok_or_else(login_required),
        GateOutcome::Redirect { location } if location == LOGIN_PATH => Err(login_required()),
        GateOutcome::Redirect { location } => Err(wrong_role(location)),
        GateOutcome::Loading => Err(login_required()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAccountCommand;
    use crate::domain::{DisplayName, Email, ErrorCode, ProfileId};
    use crate::inbound::http::test_utils::test_session_middleware;
    use actix_web::{App, HttpResponse, test, web};
    use chrono::Utc;
    use rstest::rstest;
    use std::sync::Arc;

    fn teacher(id: &ProfileId) -> Profile {
        Profile::new(
            id.clone(),
            DisplayName::new("Bu Ratna").expect("name"),
            Role::Guru,
            None,
            Email::new("ratna@sekolah.id").expect("email"),
            Utc::now(),
        )
    }

    async fn gate_status(accounts: MockAccountCommand, signed_in: Option<ProfileId>) -> Error {
        let accounts: Arc<dyn AccountCommand> = Arc::new(accounts);
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(accounts))
                .route(
                    "/login/{id}",
                    web::get().to(|session: SessionContext, id: web::Path<String>| async move {
                        let id = ProfileId::new(id.into_inner()).expect("id");
                        session.persist_profile(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/murid-only",
                    web::get().to(
                        |session: SessionContext,
                         accounts: web::Data<Arc<dyn AccountCommand>>| async move {
                            require_role(&session, accounts.get_ref().as_ref(), Role::Murid)
                                .await?;
                            Ok::<_, Error>(HttpResponse::Ok())
                        },
                    ),
                ),
        )
        .await;

        let mut request = test::TestRequest::get().uri("/murid-only");
        if let Some(id) = signed_in {
            let res = test::call_service(
                &app,
                test::TestRequest::get()
                    .uri(&format!("/login/{id}"))
                    .to_request(),
            )
            .await;
            let cookie = res
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .expect("session cookie")
                .into_owned();
            request = request.cookie(cookie);
        }
        let res = test::call_service(&app, request.to_request()).await;
        test::read_body_json(res).await
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_caller_is_sent_to_login() {
        let error = gate_status(MockAccountCommand::new(), None).await;
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.details().map(|d| d["redirect"].clone()), Some(json!("/")));
    }

    #[rstest]
    #[actix_web::test]
    async fn teacher_is_sent_to_own_dashboard() {
        let id = ProfileId::random();
        let profile = teacher(&id);
        let mut accounts = MockAccountCommand::new();
        accounts
            .expect_find_profile()
            .times(1)
            .return_once(move |_| Ok(Some(profile)));

        let error = gate_status(accounts, Some(id)).await;
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(
            error.details().map(|d| d["redirect"].clone()),
            Some(json!("/guru/dashboard"))
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn failed_profile_fetch_counts_as_signed_out() {
        let mut accounts = MockAccountCommand::new();
        accounts
            .expect_find_profile()
            .times(1)
            .return_once(|_| Err(Error::service_unavailable("profiles down")));

        let error = gate_status(accounts, Some(ProfileId::random())).await;
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
