/// Resident registry
///
/// Writes run the storage-free rules from [`validation`](super::validation)
/// first, then name uniqueness (excluding the resident itself on update),
/// then the apartment reference. The first failure wins.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::validation::{BirthYearBounds, ResidentDraft, ValidResident};
use super::{RegistryError, RegistryResult};
use crate::models::resident::{Resident, ResidentDetails, ResidentFields};
use crate::store::{Store, StoreError};

const DUPLICATE_NAME: &str = "Resident with this name already exists";
const NOT_FOUND: &str = "Resident not found";

fn map_write_error(err: StoreError) -> RegistryError {
    match err {
        StoreError::UniqueViolation(_) => RegistryError::Conflict(DUPLICATE_NAME.to_string()),
        StoreError::ForeignKeyViolation(_) => RegistryError::UnknownApartment,
        other => RegistryError::Store(other),
    }
}

/// CRUD and validation for residents
#[derive(Clone)]
pub struct ResidentRegistry {
    store: Arc<dyn Store>,
    birth_years: BirthYearBounds,
}

impl ResidentRegistry {
    /// Creates a registry with the default year-of-birth range
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            birth_years: BirthYearBounds::default(),
        }
    }

    /// Overrides the accepted year-of-birth range
    pub fn with_birth_years(mut self, bounds: BirthYearBounds) -> Self {
        self.birth_years = bounds;
        self
    }

    /// Accepted year-of-birth range
    pub fn birth_years(&self) -> BirthYearBounds {
        self.birth_years
    }

    /// Lists residents with their apartments, newest first
    pub async fn list(&self) -> RegistryResult<Vec<ResidentDetails>> {
        Ok(self.store.list_residents().await?)
    }

    /// Fetches one resident with its apartment
    pub async fn get(&self, id: Uuid) -> RegistryResult<ResidentDetails> {
        self.store
            .resident_details(id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(NOT_FOUND.to_string()))
    }

    /// Creates a resident
    ///
    /// # Errors
    ///
    /// `Validation` (rules 1-4), `Conflict` (rule 5), or `UnknownApartment`
    /// (rule 6).
    pub async fn create(&self, draft: &ResidentDraft) -> RegistryResult<Resident> {
        let valid = draft.validate(&self.birth_years)?;
        let fields = self.check_references(valid, None).await?;

        let resident = self
            .store
            .insert_resident(fields)
            .await
            .map_err(map_write_error)?;

        info!(
            resident_id = %resident.id,
            resident_name = %resident.resident_name,
            apartment_id = %resident.apartment_id,
            "Resident created"
        );
        Ok(resident)
    }

    /// Replaces a resident's fields
    ///
    /// # Errors
    ///
    /// As for [`create`](Self::create), plus `NotFound` once the input has
    /// passed rules 1-4.
    pub async fn update(&self, id: Uuid, draft: &ResidentDraft) -> RegistryResult<Resident> {
        let valid = draft.validate(&self.birth_years)?;

        if self.store.resident_by_id(id).await?.is_none() {
            return Err(RegistryError::NotFound(NOT_FOUND.to_string()));
        }

        let fields = self.check_references(valid, Some(id)).await?;

        let resident = self
            .store
            .update_resident(id, fields)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| RegistryError::NotFound(NOT_FOUND.to_string()))?;

        info!(resident_id = %resident.id, "Resident updated");
        Ok(resident)
    }

    /// Deletes a resident
    pub async fn delete(&self, id: Uuid) -> RegistryResult<Resident> {
        let resident = self
            .store
            .delete_resident(id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(NOT_FOUND.to_string()))?;

        info!(resident_id = %id, resident_name = %resident.resident_name, "Resident deleted");
        Ok(resident)
    }

    // Rules 5 and 6
    async fn check_references(
        &self,
        valid: ValidResident,
        excluding: Option<Uuid>,
    ) -> RegistryResult<ResidentFields> {
        if self
            .store
            .resident_by_name(&valid.resident_name, excluding)
            .await?
            .is_some()
        {
            debug!(resident_name = %valid.resident_name, "Rejected duplicate resident name");
            return Err(RegistryError::Conflict(DUPLICATE_NAME.to_string()));
        }

        let apartment_id =
            Uuid::parse_str(&valid.apartment).map_err(|_| RegistryError::UnknownApartment)?;
        if self.store.apartment_by_id(apartment_id).await?.is_none() {
            debug!(apartment_id = %apartment_id, "Rejected unknown apartment reference");
            return Err(RegistryError::UnknownApartment);
        }

        Ok(ResidentFields {
            resident_name: valid.resident_name,
            resident_description: valid.resident_description,
            floor: valid.floor,
            year_of_birth: valid.year_of_birth,
            is_owned: valid.is_owned,
            apartment_id,
        })
    }
}
