//! Backend entry-point: loads settings, prepares storage, and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use lab_reports::inbound::http::health::HealthState;
use lab_reports::inbound::http::session_config::{BuildMode, session_settings_from_env};
use lab_reports::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, HttpSettings, ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let http = HttpSettings::try_from(&settings).wrap_err("invalid server settings")?;

    let mut config = ServerConfig::new(session.key, session.cookie_secure, http);
    if let Some(url) = settings.database_url.as_deref() {
        run_pending_migrations(url)
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .wrap_err("failed to build database pool")?;
        info!("using PostgreSQL persistence");
        config = config.with_db_pool(pool);
    }
    if let Some(root) = settings.storage_root.clone() {
        config = config.with_storage_root(root);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config, settings.seed_accounts)
        .await
        .wrap_err("failed to start server")?;
    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated with an error")
}
