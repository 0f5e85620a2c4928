//! Driving port for account use-cases: registration, sign-in, and the
//! profile lookup behind every gated request.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Profile, ProfileId, Registration};

/// Account operations used by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account. Does not sign the caller in.
    async fn register(&self, registration: &Registration) -> Result<Profile, Error>;

    /// Check credentials and return the caller's profile.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Profile, Error>;

    /// Profile for a session's id; `None` when it no longer exists.
    async fn find_profile(&self, id: &ProfileId) -> Result<Option<Profile>, Error>;
}
