//! In-process account store implementing the identity and profile ports.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    IdentityProvider, IdentityProviderError, ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{LoginCredentials, Profile, ProfileId, Registration, Role};
use crate::outbound::password::{hash_password, verify_password};

const POISONED: &str = "account store lock poisoned";

struct AccountRecord {
    profile: Profile,
    password_hash: String,
}

/// Accounts held in memory, in registration order.
#[derive(Default)]
pub struct MemoryAccounts {
    records: RwLock<Vec<AccountRecord>>,
}

impl MemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile lookup for sibling adapters that join on owners.
    pub(crate) fn profile(&self, id: &ProfileId) -> Option<Profile> {
        let records = self.records.read().ok()?;
        records
            .iter()
            .find(|record| record.profile.id() == id)
            .map(|record| record.profile.clone())
    }

    fn read_profiles<T>(
        &self,
        f: impl FnOnce(&[AccountRecord]) -> T,
    ) -> Result<T, ProfileRepositoryError> {
        self.records
            .read()
            .map(|records| f(&records))
            .map_err(|_| ProfileRepositoryError::query(POISONED))
    }
}

#[async_trait]
impl IdentityProvider for MemoryAccounts {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<ProfileId, IdentityProviderError> {
        let records = self
            .records
            .read()
            .map_err(|_| IdentityProviderError::query(POISONED))?;
        records
            .iter()
            .find(|record| record.profile.email() == credentials.email())
            .filter(|record| verify_password(credentials.password(), &record.password_hash))
            .map(|record| record.profile.id().clone())
            .ok_or(IdentityProviderError::InvalidCredentials)
    }

    async fn sign_up(
        &self,
        registration: &Registration,
        created_at: DateTime<Utc>,
    ) -> Result<Profile, IdentityProviderError> {
        let password_hash = hash_password(registration.password())
            .map_err(|err| IdentityProviderError::query(err.to_string()))?;
        let mut records = self
            .records
            .write()
            .map_err(|_| IdentityProviderError::query(POISONED))?;
        if records
            .iter()
            .any(|record| record.profile.email() == registration.email())
        {
            return Err(IdentityProviderError::email_taken(
                registration.email().as_ref(),
            ));
        }
        let profile = Profile::new(
            ProfileId::random(),
            registration.display_name().clone(),
            registration.role(),
            registration.class_label().cloned(),
            registration.email().clone(),
            created_at,
        );
        records.push(AccountRecord {
            profile: profile.clone(),
            password_hash,
        });
        Ok(profile)
    }
}

#[async_trait]
impl ProfileRepository for MemoryAccounts {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        self.read_profiles(|records| {
            records
                .iter()
                .find(|record| record.profile.id() == id)
                .map(|record| record.profile.clone())
        })
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Profile>, ProfileRepositoryError> {
        self.read_profiles(|records| {
            let mut profiles: Vec<Profile> = records
                .iter()
                .filter(|record| record.profile.role() == role)
                .map(|record| record.profile.clone())
                .collect();
            profiles.sort_by_key(Profile::created_at);
            profiles
        })
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, ProfileRepositoryError> {
        self.read_profiles(|records| {
            records
                .iter()
                .filter(|record| record.profile.role() == role)
                .count() as u64
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegistrationInput;
    use rstest::{fixture, rstest};

    fn registration(email: &str, role: &str, class_label: Option<&str>) -> Registration {
        Registration::try_from_input(RegistrationInput {
            email,
            password: "rahasia",
            display_name: "Siti Rahmawati",
            role,
            class_label,
        })
        .expect("valid registration")
    }

    #[fixture]
    fn accounts() -> MemoryAccounts {
        MemoryAccounts::new()
    }

    #[rstest]
    #[tokio::test]
    async fn registered_account_can_sign_in(accounts: MemoryAccounts) {
        let profile = accounts
            .sign_up(&registration("siti@sekolah.id", "MURID", Some("XI TKJ 2")), Utc::now())
            .await
            .expect("sign up");

        let credentials =
            LoginCredentials::try_from_parts("SITI@sekolah.id", "rahasia").expect("credentials");
        let id = accounts.sign_in(&credentials).await.expect("sign in");
        assert_eq!(&id, profile.id());
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same(accounts: MemoryAccounts) {
        accounts
            .sign_up(&registration("guru@sekolah.id", "GURU", None), Utc::now())
            .await
            .expect("sign up");

        for (email, password) in [("guru@sekolah.id", "salah123"), ("lain@sekolah.id", "rahasia")] {
            let credentials = LoginCredentials::try_from_parts(email, password).expect("shape");
            let error = accounts.sign_in(&credentials).await.expect_err("rejected");
            assert_eq!(error, IdentityProviderError::InvalidCredentials);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_refused(accounts: MemoryAccounts) {
        accounts
            .sign_up(&registration("guru@sekolah.id", "GURU", None), Utc::now())
            .await
            .expect("first sign up");
        let error = accounts
            .sign_up(&registration("Guru@Sekolah.id", "GURU", None), Utc::now())
            .await
            .expect_err("duplicate");
        assert!(matches!(error, IdentityProviderError::EmailTaken { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn counts_and_lists_by_role(accounts: MemoryAccounts) {
        for (email, role, class) in [
            ("a@sekolah.id", "MURID", Some("X-1")),
            ("b@sekolah.id", "GURU", None),
            ("c@sekolah.id", "MURID", Some("X-2")),
        ] {
            accounts
                .sign_up(&registration(email, role, class), Utc::now())
                .await
                .expect("sign up");
        }

        assert_eq!(accounts.count_by_role(Role::Murid).await.expect("count"), 2);
        assert_eq!(accounts.count_by_role(Role::Guru).await.expect("count"), 1);
        let murid = accounts.list_by_role(Role::Murid).await.expect("list");
        let emails: Vec<_> = murid.iter().map(|p| p.email().as_ref().to_owned()).collect();
        assert_eq!(emails, ["a@sekolah.id", "c@sekolah.id"]);
    }
}
