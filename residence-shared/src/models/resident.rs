/// Resident model and database operations
///
/// Every resident references exactly one apartment. The foreign key is
/// `ON DELETE RESTRICT`, so the database itself refuses to orphan residents.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE residents (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     resident_name TEXT NOT NULL UNIQUE,
///     resident_description TEXT NOT NULL,
///     floor INTEGER NOT NULL CHECK (floor BETWEEN 1 AND 40),
///     year_of_birth INTEGER NOT NULL,
///     is_owned BOOLEAN NOT NULL DEFAULT FALSE,
///     apartment_id UUID NOT NULL REFERENCES apartments (id) ON DELETE RESTRICT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::apartment::Apartment;

/// Resident row
///
/// Serialized with the API's field names: `residentName`, `yOB`, and
/// `apartment` (the apartment ID).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    /// Unique resident ID
    pub id: Uuid,

    /// Display name, unique, limited to `[A-Za-z0-9 /]`
    pub resident_name: String,

    /// Free-text description
    pub resident_description: String,

    /// Floor number, 1 through 40
    pub floor: i32,

    /// Year of birth
    #[serde(rename = "yOB")]
    pub year_of_birth: i32,

    /// Whether the resident owns their unit
    pub is_owned: bool,

    /// Referenced apartment
    #[serde(rename = "apartment")]
    pub apartment_id: Uuid,

    /// When the resident was created
    pub created_at: DateTime<Utc>,

    /// When the resident was last updated
    pub updated_at: DateTime<Utc>,
}

/// Resident joined with its apartment, as returned by list and get
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentDetails {
    /// Unique resident ID
    pub id: Uuid,

    /// Display name
    pub resident_name: String,

    /// Free-text description
    pub resident_description: String,

    /// Floor number
    pub floor: i32,

    /// Year of birth
    #[serde(rename = "yOB")]
    pub year_of_birth: i32,

    /// Ownership flag
    pub is_owned: bool,

    /// The referenced apartment, fully populated
    pub apartment: Apartment,

    /// When the resident was created
    pub created_at: DateTime<Utc>,

    /// When the resident was last updated
    pub updated_at: DateTime<Utc>,
}

impl ResidentDetails {
    /// Joins a resident with its apartment
    pub fn new(resident: Resident, apartment: Apartment) -> Self {
        Self {
            id: resident.id,
            resident_name: resident.resident_name,
            resident_description: resident.resident_description,
            floor: resident.floor,
            year_of_birth: resident.year_of_birth,
            is_owned: resident.is_owned,
            apartment,
            created_at: resident.created_at,
            updated_at: resident.updated_at,
        }
    }
}

/// Validated writable fields of a resident
///
/// Used for both inserts and full-replacement updates. Values here have
/// already passed the registry's validation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentFields {
    /// Display name
    pub resident_name: String,

    /// Free-text description
    pub resident_description: String,

    /// Floor number
    pub floor: i32,

    /// Year of birth
    pub year_of_birth: i32,

    /// Ownership flag
    pub is_owned: bool,

    /// Referenced apartment
    pub apartment_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct ResidentDetailsRow {
    id: Uuid,
    resident_name: String,
    resident_description: String,
    floor: i32,
    year_of_birth: i32,
    is_owned: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    apartment_id: Uuid,
    apartment_name: String,
    total_of_floors: Option<i32>,
    apartment_created_at: DateTime<Utc>,
    apartment_updated_at: DateTime<Utc>,
}

impl From<ResidentDetailsRow> for ResidentDetails {
    fn from(row: ResidentDetailsRow) -> Self {
        Self {
            id: row.id,
            resident_name: row.resident_name,
            resident_description: row.resident_description,
            floor: row.floor,
            year_of_birth: row.year_of_birth,
            is_owned: row.is_owned,
            apartment: Apartment {
                id: row.apartment_id,
                apartment_name: row.apartment_name,
                total_of_floors: row.total_of_floors,
                created_at: row.apartment_created_at,
                updated_at: row.apartment_updated_at,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const RESIDENT_COLUMNS: &str = "id, resident_name, resident_description, floor, year_of_birth, \
                                is_owned, apartment_id, created_at, updated_at";

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.resident_name, r.resident_description, r.floor, r.year_of_birth,
           r.is_owned, r.created_at, r.updated_at,
           a.id AS apartment_id, a.apartment_name, a.total_of_floors,
           a.created_at AS apartment_created_at, a.updated_at AS apartment_updated_at
    FROM residents r
    JOIN apartments a ON a.id = r.apartment_id
"#;

impl Resident {
    /// Creates a resident
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate name (unique violation), an unknown
    /// apartment (foreign-key violation), or a connection failure.
    pub async fn create(pool: &PgPool, data: ResidentFields) -> Result<Self, sqlx::Error> {
        let resident = sqlx::query_as::<_, Resident>(&format!(
            "INSERT INTO residents
                (resident_name, resident_description, floor, year_of_birth, is_owned, apartment_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            RESIDENT_COLUMNS
        ))
        .bind(data.resident_name)
        .bind(data.resident_description)
        .bind(data.floor)
        .bind(data.year_of_birth)
        .bind(data.is_owned)
        .bind(data.apartment_id)
        .fetch_one(pool)
        .await?;

        Ok(resident)
    }

    /// Finds a resident by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let resident = sqlx::query_as::<_, Resident>(&format!(
            "SELECT {} FROM residents WHERE id = $1",
            RESIDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(resident)
    }

    /// Finds a resident by exact name, optionally ignoring one ID
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let resident = sqlx::query_as::<_, Resident>(&format!(
            "SELECT {} FROM residents WHERE resident_name = $1 AND ($2::uuid IS NULL OR id <> $2)",
            RESIDENT_COLUMNS
        ))
        .bind(name)
        .bind(excluding)
        .fetch_optional(pool)
        .await?;

        Ok(resident)
    }

    /// Lists all residents with their apartments, newest first
    pub async fn list_with_apartments(pool: &PgPool) -> Result<Vec<ResidentDetails>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ResidentDetailsRow>(&format!(
            "{} ORDER BY r.created_at DESC",
            DETAILS_SELECT
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(ResidentDetails::from).collect())
    }

    /// Finds one resident joined with its apartment
    pub async fn find_with_apartment(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ResidentDetails>, sqlx::Error> {
        let row = sqlx::query_as::<_, ResidentDetailsRow>(&format!(
            "{} WHERE r.id = $1",
            DETAILS_SELECT
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(ResidentDetails::from))
    }

    /// Replaces the writable fields of a resident
    ///
    /// Returns `None` if no resident has that ID.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: ResidentFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        let resident = sqlx::query_as::<_, Resident>(&format!(
            "UPDATE residents
             SET resident_name = $2, resident_description = $3, floor = $4,
                 year_of_birth = $5, is_owned = $6, apartment_id = $7, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            RESIDENT_COLUMNS
        ))
        .bind(id)
        .bind(data.resident_name)
        .bind(data.resident_description)
        .bind(data.floor)
        .bind(data.year_of_birth)
        .bind(data.is_owned)
        .bind(data.apartment_id)
        .fetch_optional(pool)
        .await?;

        Ok(resident)
    }

    /// Deletes a resident, returning the removed row
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let resident = sqlx::query_as::<_, Resident>(&format!(
            "DELETE FROM residents WHERE id = $1 RETURNING {}",
            RESIDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(resident)
    }
}
