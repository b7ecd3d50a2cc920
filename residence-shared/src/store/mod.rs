/// Storage abstraction for accounts, apartments, residents, and sessions
///
/// The registries and the auth service talk to storage only through the
/// [`Store`] trait. Two implementations exist:
///
/// - [`postgres::PgStore`]: the production backend, delegating to the SQL in
///   [`crate::models`]
/// - [`memory::MemoryStore`]: an in-process backend with the same constraint
///   behavior, used by the test suites
///
/// Both backends enforce name uniqueness and the resident → apartment
/// reference themselves and report violations as [`StoreError`] variants, so
/// the registries' read-then-write checks have a backstop under concurrent
/// writers.
///
/// # Example
///
/// ```no_run
/// use residence_shared::store::{postgres::PgStore, Store};
/// use std::sync::Arc;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
/// let apartments = store.list_apartments().await?;
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    account::{Account, NewAccount},
    apartment::{Apartment, ApartmentDeletion, ApartmentFields},
    resident::{Resident, ResidentDetails, ResidentFields},
    session::{NewSession, Session},
};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign-key constraint rejected the write
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }

        StoreError::Database(err.to_string())
    }
}

/// Storage result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations needed by the residence manager
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Finds an account by ID
    async fn account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Finds an account by exact username
    async fn account_by_username(&self, username: &str) -> StoreResult<Option<Account>>;

    /// Inserts an account; duplicate usernames yield `UniqueViolation`
    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account>;

    /// Counts accounts
    async fn count_accounts(&self) -> StoreResult<i64>;

    /// Lists apartments sorted by name ascending
    async fn list_apartments(&self) -> StoreResult<Vec<Apartment>>;

    /// Finds an apartment by ID
    async fn apartment_by_id(&self, id: Uuid) -> StoreResult<Option<Apartment>>;

    /// Finds an apartment by exact name, skipping `excluding` if given
    async fn apartment_by_name(
        &self,
        name: &str,
        excluding: Option<Uuid>,
    ) -> StoreResult<Option<Apartment>>;

    /// Inserts an apartment; duplicate names yield `UniqueViolation`
    async fn insert_apartment(&self, fields: ApartmentFields) -> StoreResult<Apartment>;

    /// Replaces an apartment's fields; `None` if the ID is unknown
    async fn update_apartment(
        &self,
        id: Uuid,
        fields: ApartmentFields,
    ) -> StoreResult<Option<Apartment>>;

    /// Deletes an apartment atomically, unless residents reference it
    async fn delete_unreferenced_apartment(&self, id: Uuid) -> StoreResult<ApartmentDeletion>;

    /// Lists residents with their apartments, newest first
    async fn list_residents(&self) -> StoreResult<Vec<ResidentDetails>>;

    /// Finds a resident by ID
    async fn resident_by_id(&self, id: Uuid) -> StoreResult<Option<Resident>>;

    /// Finds a resident joined with its apartment
    async fn resident_details(&self, id: Uuid) -> StoreResult<Option<ResidentDetails>>;

    /// Finds a resident by exact name, skipping `excluding` if given
    async fn resident_by_name(
        &self,
        name: &str,
        excluding: Option<Uuid>,
    ) -> StoreResult<Option<Resident>>;

    /// Inserts a resident; unknown apartments yield `ForeignKeyViolation`
    async fn insert_resident(&self, fields: ResidentFields) -> StoreResult<Resident>;

    /// Replaces a resident's fields; `None` if the ID is unknown
    async fn update_resident(
        &self,
        id: Uuid,
        fields: ResidentFields,
    ) -> StoreResult<Option<Resident>>;

    /// Deletes a resident, returning the removed row
    async fn delete_resident(&self, id: Uuid) -> StoreResult<Option<Resident>>;

    /// Inserts a dashboard session
    async fn insert_session(&self, session: NewSession) -> StoreResult<Session>;

    /// Finds a session by token hash
    async fn session_by_hash(&self, token_hash: &str) -> StoreResult<Option<Session>>;

    /// Deletes a session, returning whether it existed
    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool>;

    /// Removes expired sessions, returning how many were removed
    async fn purge_expired_sessions(&self) -> StoreResult<u64>;
}
