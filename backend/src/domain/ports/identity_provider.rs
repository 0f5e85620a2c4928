//! Port for the account store behind sign-in and registration.
//!
//! The adapter owns credential material. The domain never sees a password
//! hash; it hands over validated credentials and gets back profile data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{LoginCredentials, Profile, ProfileId, Registration};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// Email unknown or password wrong. Adapters must not say which.
        InvalidCredentials => "invalid email or password",
        /// An account with this email already exists.
        EmailTaken { email: String } => "email already registered: {email}",
        /// The backing store could not be reached.
        Connection { message: String } => "identity store connection failed: {message}",
        /// A query against the backing store failed.
        Query { message: String } => "identity store query failed: {message}",
    }
}

/// Account store used for sign-in and registration.
///
/// Sign-out has no counterpart here: it is the session purge performed by the
/// inbound adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and return the matching profile id.
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<ProfileId, IdentityProviderError>;

    /// Create the account and its profile in one step.
    async fn sign_up(
        &self,
        registration: &Registration,
        created_at: DateTime<Utc>,
    ) -> Result<Profile, IdentityProviderError>;
}
