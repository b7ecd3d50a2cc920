/// Administrator credential store
///
/// Creates accounts with Argon2id-hashed secrets and verifies login
/// attempts. Verification never reveals whether the username or the secret
/// was wrong.
///
/// # Example
///
/// ```
/// use residence_shared::auth::credentials::CredentialStore;
/// use residence_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
/// credentials.create("admin", "123456789").await?;
///
/// assert!(credentials.verify("admin", "123456789").await?);
/// assert!(!credentials.verify("admin", "wrong").await?);
/// assert!(!credentials.verify("nobody", "123456789").await?);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use tracing::{info, warn};

use super::password::{hash_password, verify_password, PasswordError};
use crate::models::account::{Account, NewAccount};
use crate::registry::{RegistryError, RegistryResult};
use crate::store::{Store, StoreError};

/// Username seeded when no account exists
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Secret seeded when no account exists; must be changed in production
pub const DEFAULT_ADMIN_PASSWORD: &str = "123456789";

const DUPLICATE_USERNAME: &str = "Username already exists";

/// Error type for credential verification
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Stored hash could not be checked
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Account creation and secret verification
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn Store>,
}

impl CredentialStore {
    /// Creates a credential store over `store`
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates an account, hashing `secret` first
    ///
    /// # Errors
    ///
    /// `Conflict` if the username exists; `Password` or `Store` on internal
    /// failure.
    pub async fn create(&self, username: &str, secret: &str) -> RegistryResult<Account> {
        if self.store.account_by_username(username).await?.is_some() {
            return Err(RegistryError::Conflict(DUPLICATE_USERNAME.to_string()));
        }

        let password_hash = hash_password(secret)?;
        let account = self
            .store
            .insert_account(NewAccount {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    RegistryError::Conflict(DUPLICATE_USERNAME.to_string())
                }
                other => RegistryError::Store(other),
            })?;

        info!(account_id = %account.id, username = %account.username, "Account created");
        Ok(account)
    }

    /// Returns the account when `secret` matches its stored hash
    ///
    /// An unknown username and a wrong secret both yield `None`.
    pub async fn authenticate(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<Option<Account>, CredentialError> {
        let Some(account) = self.store.account_by_username(username).await? else {
            return Ok(None);
        };

        if verify_password(secret, &account.password_hash)? {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }

    /// Whether `secret` is correct for `username`
    pub async fn verify(&self, username: &str, secret: &str) -> Result<bool, CredentialError> {
        Ok(self.authenticate(username, secret).await?.is_some())
    }

    /// Seeds one administrator account if no account exists
    ///
    /// Idempotent: returns `true` only on the call that created the account.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        secret: &str,
    ) -> RegistryResult<bool> {
        if self.store.count_accounts().await? > 0 {
            return Ok(false);
        }

        match self.create(username, secret).await {
            Ok(_) => {}
            // Another instance seeded between the count and the insert
            Err(RegistryError::Conflict(_)) => return Ok(false),
            Err(e) => return Err(e),
        }

        if secret == DEFAULT_ADMIN_PASSWORD {
            warn!(username, "Seeded administrator with the default password; change it");
        } else {
            info!(username, "Seeded administrator account");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn credentials() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let credentials = credentials();
        credentials.create("admin", "secret-one").await.unwrap();

        let err = credentials.create("admin", "secret-two").await.unwrap_err();
        assert!(matches!(err, RegistryError::Conflict(ref m) if m == DUPLICATE_USERNAME));
    }

    #[tokio::test]
    async fn test_secret_is_hashed() {
        let credentials = credentials();
        let account = credentials.create("admin", "123456789").await.unwrap();

        assert_ne!(account.password_hash, "123456789");
        assert!(account.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_verify() {
        let credentials = credentials();
        credentials.create("admin", "123456789").await.unwrap();

        assert!(credentials.verify("admin", "123456789").await.unwrap());
        assert!(!credentials.verify("admin", "987654321").await.unwrap());
        assert!(!credentials.verify("Admin", "123456789").await.unwrap());
        assert!(!credentials.verify("ghost", "123456789").await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_default_admin_is_idempotent() {
        let credentials = credentials();

        assert!(credentials
            .ensure_default_admin(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap());
        assert!(!credentials
            .ensure_default_admin(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap());

        assert!(credentials
            .verify(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_ensure_default_admin_skips_when_accounts_exist() {
        let credentials = credentials();
        credentials.create("operator", "hunter22").await.unwrap();

        assert!(!credentials.ensure_default_admin("admin", "123456789").await.unwrap());
        assert!(!credentials.verify("admin", "123456789").await.unwrap());
    }
}
