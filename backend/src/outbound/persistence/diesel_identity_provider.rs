//! PostgreSQL-backed `IdentityProvider`.
//!
//! Accounts and profiles share the `profiles` row: sign-up inserts both at
//! once, so a profile can never be missing for a registered email.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{LoginCredentials, Profile, ProfileId, Registration};
use crate::outbound::password::{hash_password, verify_password};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewProfileRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed identity provider.
#[derive(Clone)]
pub struct DieselIdentityProvider {
    pool: DbPool,
}

impl DieselIdentityProvider {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityProviderError {
    map_basic_pool_error(error, IdentityProviderError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityProviderError {
    map_basic_diesel_error(
        error,
        IdentityProviderError::query,
        IdentityProviderError::connection,
    )
}

#[async_trait]
impl IdentityProvider for DieselIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<ProfileId, IdentityProviderError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = profiles::table
            .filter(profiles::email.eq(credentials.email().as_ref()))
            .select(ProfileRow::as_select())
            .first::<ProfileRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) if verify_password(credentials.password(), &row.password_hash) => {
                Ok(ProfileId::from_uuid(row.id))
            }
            Some(_) => {
                debug!("password mismatch");
                Err(IdentityProviderError::InvalidCredentials)
            }
            None => {
                debug!("unknown email");
                Err(IdentityProviderError::InvalidCredentials)
            }
        }
    }

    async fn sign_up(
        &self,
        registration: &Registration,
        created_at: DateTime<Utc>,
    ) -> Result<Profile, IdentityProviderError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = ProfileId::random();
        let password_hash = hash_password(registration.password())
            .map_err(|err| IdentityProviderError::query(err.to_string()))?;
        let row = NewProfileRow {
            id: *id.as_uuid(),
            email: registration.email().as_ref(),
            password_hash: &password_hash,
            display_name: registration.display_name().as_ref(),
            role: registration.role().as_str(),
            class_label: registration.class_label().map(AsRef::as_ref),
            created_at,
        };

        diesel::insert_into(profiles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|error| {
                if is_unique_violation(&error) {
                    IdentityProviderError::email_taken(registration.email().as_ref())
                } else {
                    map_diesel_error(error)
                }
            })?;

        Ok(Profile::new(
            id,
            registration.display_name().clone(),
            registration.role(),
            registration.class_label().cloned(),
            registration.email().clone(),
            created_at,
        ))
    }
}
