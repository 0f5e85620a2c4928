//! Application settings and the assembled server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::Key;
use chrono::FixedOffset;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use lab_reports::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/storage/";
const DEFAULT_UTC_OFFSET: &str = "+07:00";
/// Ten photos travel base64-encoded in one JSON body.
pub const DEFAULT_JSON_LIMIT: usize = 40 * 1024 * 1024;

/// Settings that are present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid public base URL '{value}': {message}")]
    PublicBaseUrl { value: String, message: String },
    #[error("invalid UTC offset '{value}'; expected a value such as +07:00")]
    UtcOffset { value: String },
}

/// Values read from `LAB_REPORTS_*` environment variables, configuration
/// files, and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LAB_REPORTS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Directory for stored photos; photos stay in memory when absent.
    pub storage_root: Option<PathBuf>,
    /// URL under which `/storage` is reachable by browsers.
    pub public_base_url: Option<String>,
    /// School time zone as a fixed offset, used for date presets.
    pub utc_offset: Option<String>,
    /// Largest accepted JSON body in bytes.
    pub json_limit: Option<usize>,
    /// Create one teacher and one student account at startup.
    #[ortho_config(default = false)]
    pub seed_accounts: bool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn public_base_url(&self) -> Result<Url, SettingsError> {
        let value = self
            .public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL);
        Url::parse(value).map_err(|err| SettingsError::PublicBaseUrl {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn utc_offset(&self) -> Result<FixedOffset, SettingsError> {
        let value = self.utc_offset.as_deref().unwrap_or(DEFAULT_UTC_OFFSET);
        value.trim().parse().map_err(|_| SettingsError::UtcOffset {
            value: value.to_owned(),
        })
    }

    pub fn json_limit(&self) -> usize {
        self.json_limit.unwrap_or(DEFAULT_JSON_LIMIT)
    }
}

/// Listener, session, and photo settings resolved at startup.
pub struct HttpSettings {
    pub bind_addr: SocketAddr,
    pub public_base_url: Url,
    pub utc_offset: FixedOffset,
    pub json_limit: usize,
}

impl TryFrom<&AppSettings> for HttpSettings {
    type Error = SettingsError;

    fn try_from(settings: &AppSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            public_base_url: settings.public_base_url()?,
            utc_offset: settings.utc_offset()?,
            json_limit: settings.json_limit(),
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) http: HttpSettings,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) storage_root: Option<PathBuf>,
}

impl ServerConfig {
    /// Construct a configuration backed by in-memory adapters.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, http: HttpSettings) -> Self {
        Self {
            key,
            cookie_secure,
            http,
            db_pool: None,
            storage_root: None,
        }
    }

    /// Persist accounts and reports in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Store photos below `root` on local disk.
    #[must_use]
    pub fn with_storage_root(mut self, root: PathBuf) -> Self {
        self.storage_root = Some(root);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.http.bind_addr
    }
}
