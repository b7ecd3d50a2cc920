/// In-process [`Store`] implementation
///
/// Keeps every collection behind a single `RwLock`, which makes each trait
/// call atomic. Constraint behavior mirrors the PostgreSQL schema: unique
/// names, resident → apartment references, and session → account references
/// are all enforced here and reported with the same [`StoreError`] variants.
///
/// # Example
///
/// ```
/// use residence_shared::models::apartment::ApartmentFields;
/// use residence_shared::store::{memory::MemoryStore, Store};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// store
///     .insert_apartment(ApartmentFields {
///         apartment_name: "Sunrise".to_string(),
///         total_of_floors: None,
///     })
///     .await?;
/// assert_eq!(store.list_apartments().await?.len(), 1);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    account::{Account, NewAccount},
    apartment::{Apartment, ApartmentDeletion, ApartmentFields},
    resident::{Resident, ResidentDetails, ResidentFields},
    session::{NewSession, Session},
};

#[derive(Debug, Default)]
struct MemoryState {
    accounts: Vec<Account>,
    apartments: Vec<Apartment>,
    // insertion order; ties on created_at resolve newest-first when listing
    residents: Vec<Resident>,
    sessions: HashMap<String, Session>,
}

impl MemoryState {
    fn apartment(&self, id: Uuid) -> Option<&Apartment> {
        self.apartments.iter().find(|a| a.id == id)
    }

    fn apartment_name_taken(&self, name: &str, excluding: Option<Uuid>) -> bool {
        self.apartments
            .iter()
            .any(|a| a.apartment_name == name && Some(a.id) != excluding)
    }

    fn resident_name_taken(&self, name: &str, excluding: Option<Uuid>) -> bool {
        self.residents
            .iter()
            .any(|r| r.resident_name == name && Some(r.id) != excluding)
    }

    fn details(&self, resident: &Resident) -> Option<ResidentDetails> {
        self.apartment(resident.apartment_id)
            .map(|apartment| ResidentDetails::new(resident.clone(), apartment.clone()))
    }
}

/// Store holding all data in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        let mut state = self.state.write().await;
        if state.accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::UniqueViolation("accounts_username_key".to_string()));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: account.username,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.accounts.push(account.clone());
        Ok(account)
    }

    async fn count_accounts(&self) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state.accounts.len() as i64)
    }

    async fn list_apartments(&self) -> StoreResult<Vec<Apartment>> {
        let state = self.state.read().await;
        let mut apartments = state.apartments.clone();
        apartments.sort_by(|a, b| a.apartment_name.cmp(&b.apartment_name));
        Ok(apartments)
    }

    async fn apartment_by_id(&self, id: Uuid) -> StoreResult<Option<Apartment>> {
        let state = self.state.read().await;
        Ok(state.apartment(id).cloned())
    }

    async fn apartment_by_name(
        &self,
        name: &str,
        excluding: Option<Uuid>,
    ) -> StoreResult<Option<Apartment>> {
        let state = self.state.read().await;
        Ok(state
            .apartments
            .iter()
            .find(|a| a.apartment_name == name && Some(a.id) != excluding)
            .cloned())
    }

    async fn insert_apartment(&self, fields: ApartmentFields) -> StoreResult<Apartment> {
        let mut state = self.state.write().await;
        if state.apartment_name_taken(&fields.apartment_name, None) {
            return Err(StoreError::UniqueViolation(
                "apartments_apartment_name_key".to_string(),
            ));
        }

        let now = Utc::now();
        let apartment = Apartment {
            id: Uuid::new_v4(),
            apartment_name: fields.apartment_name,
            total_of_floors: fields.total_of_floors,
            created_at: now,
            updated_at: now,
        };
        state.apartments.push(apartment.clone());
        Ok(apartment)
    }

    async fn update_apartment(
        &self,
        id: Uuid,
        fields: ApartmentFields,
    ) -> StoreResult<Option<Apartment>> {
        let mut state = self.state.write().await;
        if state.apartment(id).is_none() {
            return Ok(None);
        }
        if state.apartment_name_taken(&fields.apartment_name, Some(id)) {
            return Err(StoreError::UniqueViolation(
                "apartments_apartment_name_key".to_string(),
            ));
        }

        let updated = state.apartments.iter_mut().find(|a| a.id == id).map(|apartment| {
            apartment.apartment_name = fields.apartment_name;
            apartment.total_of_floors = fields.total_of_floors;
            apartment.updated_at = Utc::now();
            apartment.clone()
        });
        Ok(updated)
    }

    async fn delete_unreferenced_apartment(&self, id: Uuid) -> StoreResult<ApartmentDeletion> {
        let mut state = self.state.write().await;
        let Some(position) = state.apartments.iter().position(|a| a.id == id) else {
            return Ok(ApartmentDeletion::NotFound);
        };

        let residents = state
            .residents
            .iter()
            .filter(|r| r.apartment_id == id)
            .count() as i64;
        if residents > 0 {
            return Ok(ApartmentDeletion::Referenced { residents });
        }

        Ok(ApartmentDeletion::Deleted(state.apartments.remove(position)))
    }

    async fn list_residents(&self) -> StoreResult<Vec<ResidentDetails>> {
        let state = self.state.read().await;
        let mut residents: Vec<ResidentDetails> = state
            .residents
            .iter()
            .rev()
            .filter_map(|r| state.details(r))
            .collect();
        residents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(residents)
    }

    async fn resident_by_id(&self, id: Uuid) -> StoreResult<Option<Resident>> {
        let state = self.state.read().await;
        Ok(state.residents.iter().find(|r| r.id == id).cloned())
    }

    async fn resident_details(&self, id: Uuid) -> StoreResult<Option<ResidentDetails>> {
        let state = self.state.read().await;
        Ok(state
            .residents
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| state.details(r)))
    }

    async fn resident_by_name(
        &self,
        name: &str,
        excluding: Option<Uuid>,
    ) -> StoreResult<Option<Resident>> {
        let state = self.state.read().await;
        Ok(state
            .residents
            .iter()
            .find(|r| r.resident_name == name && Some(r.id) != excluding)
            .cloned())
    }

    async fn insert_resident(&self, fields: ResidentFields) -> StoreResult<Resident> {
        let mut state = self.state.write().await;
        if state.resident_name_taken(&fields.resident_name, None) {
            return Err(StoreError::UniqueViolation(
                "residents_resident_name_key".to_string(),
            ));
        }
        if state.apartment(fields.apartment_id).is_none() {
            return Err(StoreError::ForeignKeyViolation(
                "residents_apartment_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let resident = Resident {
            id: Uuid::new_v4(),
            resident_name: fields.resident_name,
            resident_description: fields.resident_description,
            floor: fields.floor,
            year_of_birth: fields.year_of_birth,
            is_owned: fields.is_owned,
            apartment_id: fields.apartment_id,
            created_at: now,
            updated_at: now,
        };
        state.residents.push(resident.clone());
        Ok(resident)
    }

    async fn update_resident(
        &self,
        id: Uuid,
        fields: ResidentFields,
    ) -> StoreResult<Option<Resident>> {
        let mut state = self.state.write().await;
        if !state.residents.iter().any(|r| r.id == id) {
            return Ok(None);
        }
        if state.resident_name_taken(&fields.resident_name, Some(id)) {
            return Err(StoreError::UniqueViolation(
                "residents_resident_name_key".to_string(),
            ));
        }
        if state.apartment(fields.apartment_id).is_none() {
            return Err(StoreError::ForeignKeyViolation(
                "residents_apartment_id_fkey".to_string(),
            ));
        }

        let updated = state.residents.iter_mut().find(|r| r.id == id).map(|resident| {
            resident.resident_name = fields.resident_name;
            resident.resident_description = fields.resident_description;
            resident.floor = fields.floor;
            resident.year_of_birth = fields.year_of_birth;
            resident.is_owned = fields.is_owned;
            resident.apartment_id = fields.apartment_id;
            resident.updated_at = Utc::now();
            resident.clone()
        });
        Ok(updated)
    }

    async fn delete_resident(&self, id: Uuid) -> StoreResult<Option<Resident>> {
        let mut state = self.state.write().await;
        let removed = state
            .residents
            .iter()
            .position(|r| r.id == id)
            .map(|position| state.residents.remove(position));
        Ok(removed)
    }

    async fn insert_session(&self, session: NewSession) -> StoreResult<Session> {
        let mut state = self.state.write().await;
        if !state.accounts.iter().any(|a| a.id == session.account_id) {
            return Err(StoreError::ForeignKeyViolation(
                "sessions_account_id_fkey".to_string(),
            ));
        }
        if state.sessions.contains_key(&session.token_hash) {
            return Err(StoreError::UniqueViolation("sessions_pkey".to_string()));
        }

        let session = Session {
            token_hash: session.token_hash,
            account_id: session.account_id,
            expires_at: session.expires_at,
            created_at: Utc::now(),
        };
        state
            .sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok(session)
    }

    async fn session_by_hash(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        let state = self.state.read().await;
        Ok(state.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.sessions.remove(token_hash).is_some())
    }

    async fn purge_expired_sessions(&self) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, session| !session.is_expired());
        Ok((before - state.sessions.len()) as u64)
    }
}
