/// Apartment registry
///
/// Names are unique by exact, case-sensitive match. The uniqueness check is
/// a lookup before the write; the database unique index catches the race
/// where two writers pass the lookup together.
///
/// # Example
///
/// ```
/// use residence_shared::registry::{validation::ApartmentDraft, ApartmentRegistry};
/// use residence_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = ApartmentRegistry::new(Arc::new(MemoryStore::new()));
/// let sunrise = registry
///     .create(&ApartmentDraft {
///         apartment_name: Some("Sunrise".to_string()),
///         total_of_floors: None,
///     })
///     .await?;
/// assert_eq!(registry.get(sunrise.id).await?.apartment_name, "Sunrise");
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{validation::ApartmentDraft, RegistryError, RegistryResult};
use crate::models::apartment::{Apartment, ApartmentDeletion};
use crate::store::{Store, StoreError};

const DUPLICATE_NAME: &str = "Apartment with this name already exists";
const NOT_FOUND: &str = "Apartment not found";

fn map_write_error(err: StoreError) -> RegistryError {
    match err {
        StoreError::UniqueViolation(_) => RegistryError::Conflict(DUPLICATE_NAME.to_string()),
        other => RegistryError::Store(other),
    }
}

/// CRUD and validation for apartments
#[derive(Clone)]
pub struct ApartmentRegistry {
    store: Arc<dyn Store>,
}

impl ApartmentRegistry {
    /// Creates a registry over `store`
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Lists apartments sorted by name ascending
    pub async fn list(&self) -> RegistryResult<Vec<Apartment>> {
        Ok(self.store.list_apartments().await?)
    }

    /// Fetches one apartment
    ///
    /// # Errors
    ///
    /// `NotFound` if the ID does not resolve.
    pub async fn get(&self, id: Uuid) -> RegistryResult<Apartment> {
        self.store
            .apartment_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(NOT_FOUND.to_string()))
    }

    /// Creates an apartment
    ///
    /// # Errors
    ///
    /// `Validation` for a missing name or bad floor count, `Conflict` if the
    /// name is taken.
    pub async fn create(&self, draft: &ApartmentDraft) -> RegistryResult<Apartment> {
        let fields = draft.validate()?;

        if self
            .store
            .apartment_by_name(&fields.apartment_name, None)
            .await?
            .is_some()
        {
            debug!(apartment_name = %fields.apartment_name, "Rejected duplicate apartment name");
            return Err(RegistryError::Conflict(DUPLICATE_NAME.to_string()));
        }

        let apartment = self
            .store
            .insert_apartment(fields)
            .await
            .map_err(map_write_error)?;

        info!(
            apartment_id = %apartment.id,
            apartment_name = %apartment.apartment_name,
            "Apartment created"
        );
        Ok(apartment)
    }

    /// Replaces an apartment's fields
    ///
    /// # Errors
    ///
    /// `Validation` as for create, `Conflict` if another apartment has the
    /// name, `NotFound` if the ID does not resolve.
    pub async fn update(&self, id: Uuid, draft: &ApartmentDraft) -> RegistryResult<Apartment> {
        let fields = draft.validate()?;

        if self
            .store
            .apartment_by_name(&fields.apartment_name, Some(id))
            .await?
            .is_some()
        {
            debug!(apartment_id = %id, apartment_name = %fields.apartment_name, "Rejected duplicate apartment name");
            return Err(RegistryError::Conflict(DUPLICATE_NAME.to_string()));
        }

        let apartment = self
            .store
            .update_apartment(id, fields)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| RegistryError::NotFound(NOT_FOUND.to_string()))?;

        info!(apartment_id = %apartment.id, "Apartment updated");
        Ok(apartment)
    }

    /// Deletes an apartment that no resident references
    ///
    /// The reference check and the delete happen atomically; a rejected
    /// delete leaves the apartment untouched.
    ///
    /// # Errors
    ///
    /// `NotFound` if the ID does not resolve, `ApartmentInUse` if residents
    /// reference it.
    pub async fn delete(&self, id: Uuid) -> RegistryResult<Apartment> {
        match self.store.delete_unreferenced_apartment(id).await? {
            ApartmentDeletion::Deleted(apartment) => {
                info!(apartment_id = %id, apartment_name = %apartment.apartment_name, "Apartment deleted");
                Ok(apartment)
            }
            ApartmentDeletion::NotFound => Err(RegistryError::NotFound(NOT_FOUND.to_string())),
            ApartmentDeletion::Referenced { residents } => {
                warn!(apartment_id = %id, residents, "Refused to delete referenced apartment");
                Err(RegistryError::ApartmentInUse { residents })
            }
        }
    }
}
