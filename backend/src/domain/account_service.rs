//! Account service: registration, sign-in, and profile lookups.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, IdentityProvider, IdentityProviderError, ProfileRepository,
    ProfileRepositoryError,
};
use crate::domain::{Error, LoginCredentials, Profile, ProfileId, Registration};

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<I, P> {
    identity: Arc<I>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<I, P> AccountService<I, P> {
    pub fn new(identity: Arc<I>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity,
            profiles,
            clock,
        }
    }
}

pub(crate) fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::InvalidCredentials => {
            Error::unauthorized("Email atau password salah")
        }
        IdentityProviderError::EmailTaken { email } => Error::conflict("Email sudah terdaftar")
            .with_details(json!({
                "fields": { "email": "Email sudah terdaftar" },
                "email": email,
                "code": "email_taken",
            })),
        IdentityProviderError::Connection { message } => {
            Error::service_unavailable(format!("identity store unavailable: {message}"))
        }
        IdentityProviderError::Query { message } => {
            Error::internal(format!("identity store error: {message}"))
        }
    }
}

pub(crate) fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
    }
}

#[async_trait]
impl<I, P> AccountCommand for AccountService<I, P>
where
    I: IdentityProvider,
    P: ProfileRepository,
{
    async fn register(&self, registration: &Registration) -> Result<Profile, Error> {
        let profile = self
            .identity
            .sign_up(registration, self.clock.utc())
            .await
            .map_err(map_identity_error)?;
        info!(profile_id = %profile.id(), role = %profile.role(), "account registered");
        Ok(profile)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<Profile, Error> {
        let id = self
            .identity
            .sign_in(credentials)
            .await
            .map_err(map_identity_error)?;
        match self.find_profile(&id).await? {
            Some(profile) => Ok(profile),
            None => {
                warn!(profile_id = %id, "credentials matched an account without a profile");
                Err(Error::unauthorized("Profil tidak ditemukan"))
            }
        }
    }

    async fn find_profile(&self, id: &ProfileId) -> Result<Option<Profile>, Error> {
        self.profiles
            .find_by_id(id)
            .await
            .map_err(map_profile_error)
    }
}
