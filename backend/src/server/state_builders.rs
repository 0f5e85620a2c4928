//! Adapter selection and development seeding for the HTTP state.
//!
//! PostgreSQL adapters are used when a pool is configured and in-memory
//! adapters otherwise; photos go to disk when a storage root is set.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use lab_reports::domain::ports::{
    AccountCommand, IdentityProvider, ObjectStore, ProfileRepository, ReportRepository,
};
use lab_reports::domain::{
    AccountService, ErrorCode, Registration, RegistrationInput, ReportService, SubmissionService,
};
use lab_reports::inbound::http::state::{HttpState, HttpStatePorts};
use lab_reports::outbound::memory::{MemoryAccounts, MemoryReports};
use lab_reports::outbound::persistence::{
    DieselIdentityProvider, DieselProfileRepository, DieselReportRepository,
};
use lab_reports::outbound::storage::{CapStdObjectStore, MemoryObjectStore};

use super::ServerConfig;

const SEED_PASSWORD: &str = "rahasia123";

struct Adapters<I, P, R> {
    identity: Arc<I>,
    profiles: Arc<P>,
    reports: Arc<R>,
}

fn assemble<I, P, R, S>(
    adapters: Adapters<I, P, R>,
    store: Arc<S>,
    config: &ServerConfig,
) -> HttpState
where
    I: IdentityProvider + 'static,
    P: ProfileRepository + 'static,
    R: ReportRepository + 'static,
    S: ObjectStore + 'static,
{
    let Adapters {
        identity,
        profiles,
        reports,
    } = adapters;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let views = Arc::new(ReportService::new(
        Arc::clone(&reports),
        Arc::clone(&profiles),
        Arc::clone(&clock),
        config.http.utc_offset,
    ));
    HttpState::new(HttpStatePorts {
        accounts: Arc::new(AccountService::new(identity, profiles, Arc::clone(&clock))),
        submissions: Arc::new(SubmissionService::new(Arc::clone(&store), reports, clock)),
        reviews: views.clone(),
        views,
        photos: store,
    })
}

fn with_store<I, P, R>(
    adapters: Adapters<I, P, R>,
    config: &ServerConfig,
) -> std::io::Result<HttpState>
where
    I: IdentityProvider + 'static,
    P: ProfileRepository + 'static,
    R: ReportRepository + 'static,
{
    let base = config.http.public_base_url.clone();
    match &config.storage_root {
        Some(root) => {
            let store = CapStdObjectStore::open(root, base)?;
            info!(root = %root.display(), "storing photos on disk");
            Ok(assemble(adapters, Arc::new(store), config))
        }
        None => {
            warn!("no storage root configured; photos are kept in memory");
            Ok(assemble(adapters, Arc::new(MemoryObjectStore::new(base)), config))
        }
    }
}

/// Build the shared HTTP state from the configured adapters.
///
/// # Errors
///
/// Returns the I/O error raised while opening the storage root.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.db_pool {
        Some(pool) => with_store(
            Adapters {
                identity: Arc::new(DieselIdentityProvider::new(pool.clone())),
                profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
                reports: Arc::new(DieselReportRepository::new(pool.clone())),
            },
            config,
        )?,
        None => {
            warn!("no database configured; accounts and reports are kept in memory");
            let accounts = Arc::new(MemoryAccounts::new());
            with_store(
                Adapters {
                    identity: Arc::clone(&accounts),
                    profiles: Arc::clone(&accounts),
                    reports: Arc::new(MemoryReports::new(accounts)),
                },
                config,
            )?
        }
    };
    Ok(web::Data::new(state))
}

fn seed_registrations() -> [RegistrationInput<'static>; 2] {
    [
        RegistrationInput {
            email: "guru@sekolah.id",
            password: SEED_PASSWORD,
            display_name: "Guru Pembimbing",
            role: "GURU",
            class_label: None,
        },
        RegistrationInput {
            email: "murid@sekolah.id",
            password: SEED_PASSWORD,
            display_name: "Murid Contoh",
            role: "MURID",
            class_label: Some("XI TKJ 1"),
        },
    ]
}

/// Register the development accounts, skipping any that already exist.
///
/// # Errors
///
/// Returns the first failure other than an already registered email.
pub(super) async fn seed_accounts(accounts: &dyn AccountCommand) -> std::io::Result<()> {
    for input in seed_registrations() {
        let registration = Registration::try_from_input(input).map_err(|errors| {
            std::io::Error::other(format!("invalid seed account: {errors}"))
        })?;
        match accounts.register(&registration).await {
            Ok(profile) => {
                info!(email = %profile.email(), role = %profile.role(), "seed account created");
            }
            Err(error) if error.code() == ErrorCode::Conflict => {
                info!(email = %registration.email(), "seed account already present");
            }
            Err(error) => {
                return Err(std::io::Error::other(format!(
                    "seeding {} failed: {}",
                    registration.email(),
                    error.message()
                )));
            }
        }
    }
    Ok(())
}
