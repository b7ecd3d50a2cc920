/// PostgreSQL-backed [`Store`]
///
/// Thin adapter over the model query functions; every `sqlx::Error` is
/// classified into a [`StoreError`] on the way out.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    account::{Account, NewAccount},
    apartment::{Apartment, ApartmentDeletion, ApartmentFields},
    resident::{Resident, ResidentDetails, ResidentFields},
    session::{NewSession, Session},
};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Borrows the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }

    async fn account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(Account::find_by_id(&self.pool, id).await?)
    }

    async fn account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        Ok(Account::find_by_username(&self.pool, username).await?)
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        Ok(Account::create(&self.pool, account).await?)
    }

    async fn count_accounts(&self) -> StoreResult<i64> {
        Ok(Account::count(&self.pool).await?)
    }

    async fn list_apartments(&self) -> StoreResult<Vec<Apartment>> {
        Ok(Apartment::list(&self.pool).await?)
    }

    async fn apartment_by_id(&self, id: Uuid) -> StoreResult<Option<Apartment>> {
        Ok(Apartment::find_by_id(&self.pool, id).await?)
    }

    async fn apartment_by_name(
        &self,
        name: &str,
        excluding: Option<Uuid>,
    ) -> StoreResult<Option<Apartment>> {
        Ok(Apartment::find_by_name(&self.pool, name, excluding).await?)
    }

    async fn insert_apartment(&self, fields: ApartmentFields) -> StoreResult<Apartment> {
        Ok(Apartment::create(&self.pool, fields).await?)
    }

    async fn update_apartment(
        &self,
        id: Uuid,
        fields: ApartmentFields,
    ) -> StoreResult<Option<Apartment>> {
        Ok(Apartment::update(&self.pool, id, fields).await?)
    }

    async fn delete_unreferenced_apartment(&self, id: Uuid) -> StoreResult<ApartmentDeletion> {
        Ok(Apartment::delete_unreferenced(&self.pool, id).await?)
    }

    async fn list_residents(&self) -> StoreResult<Vec<ResidentDetails>> {
        Ok(Resident::list_with_apartments(&self.pool).await?)
    }

    async fn resident_by_id(&self, id: Uuid) -> StoreResult<Option<Resident>> {
        Ok(Resident::find_by_id(&self.pool, id).await?)
    }

    async fn resident_details(&self, id: Uuid) -> StoreResult<Option<ResidentDetails>> {
        Ok(Resident::find_with_apartment(&self.pool, id).await?)
    }

    async fn resident_by_name(
        &self,
        name: &str,
        excluding: Option<Uuid>,
    ) -> StoreResult<Option<Resident>> {
        Ok(Resident::find_by_name(&self.pool, name, excluding).await?)
    }

    async fn insert_resident(&self, fields: ResidentFields) -> StoreResult<Resident> {
        Ok(Resident::create(&self.pool, fields).await?)
    }

    async fn update_resident(
        &self,
        id: Uuid,
        fields: ResidentFields,
    ) -> StoreResult<Option<Resident>> {
        Ok(Resident::update(&self.pool, id, fields).await?)
    }

    async fn delete_resident(&self, id: Uuid) -> StoreResult<Option<Resident>> {
        Ok(Resident::delete(&self.pool, id).await?)
    }

    async fn insert_session(&self, session: NewSession) -> StoreResult<Session> {
        Ok(Session::create(&self.pool, session).await?)
    }

    async fn session_by_hash(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        Ok(Session::find_by_hash(&self.pool, token_hash).await?)
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool> {
        Ok(Session::delete_by_hash(&self.pool, token_hash).await?)
    }

    async fn purge_expired_sessions(&self) -> StoreResult<u64> {
        Ok(Session::delete_expired(&self.pool).await?)
    }
}
