/// Apartment model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE apartments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     apartment_name TEXT NOT NULL UNIQUE,
///     total_of_floors INTEGER,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// JSON field names are camelCase (`apartmentName`, `totalOfFloors`) to
/// match the API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Apartment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    /// Unique apartment ID
    pub id: Uuid,

    /// Human-readable name, unique (exact match)
    pub apartment_name: String,

    /// Optional number of floors in the building
    pub total_of_floors: Option<i32>,

    /// When the apartment was created
    pub created_at: DateTime<Utc>,

    /// When the apartment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Validated writable fields of an apartment
///
/// Used for both inserts and full-replacement updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApartmentFields {
    /// Apartment name
    pub apartment_name: String,

    /// Number of floors, if known
    pub total_of_floors: Option<i32>,
}

/// Outcome of a guarded apartment delete
#[derive(Debug, Clone, PartialEq)]
pub enum ApartmentDeletion {
    /// The apartment existed, had no residents, and is gone
    Deleted(Apartment),

    /// No apartment with that ID
    NotFound,

    /// Residents still reference the apartment; nothing was deleted
    Referenced {
        /// Number of referencing residents
        residents: i64,
    },
}

const APARTMENT_COLUMNS: &str = "id, apartment_name, total_of_floors, created_at, updated_at";

impl Apartment {
    /// Creates an apartment
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken (unique violation) or the
    /// database is unreachable.
    pub async fn create(pool: &PgPool, data: ApartmentFields) -> Result<Self, sqlx::Error> {
        let apartment = sqlx::query_as::<_, Apartment>(&format!(
            "INSERT INTO apartments (apartment_name, total_of_floors) VALUES ($1, $2) RETURNING {}",
            APARTMENT_COLUMNS
        ))
        .bind(data.apartment_name)
        .bind(data.total_of_floors)
        .fetch_one(pool)
        .await?;

        Ok(apartment)
    }

    /// Lists all apartments, sorted by name ascending in byte order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let apartments = sqlx::query_as::<_, Apartment>(&format!(
            r#"SELECT {} FROM apartments ORDER BY apartment_name COLLATE "C" ASC"#,
            APARTMENT_COLUMNS
        ))
        .fetch_all(pool)
        .await?;

        Ok(apartments)
    }

    /// Finds an apartment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let apartment = sqlx::query_as::<_, Apartment>(&format!(
            "SELECT {} FROM apartments WHERE id = $1",
            APARTMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(apartment)
    }

    /// Finds an apartment by exact name, optionally ignoring one ID
    ///
    /// Passing `excluding` lets an update check for collisions with *other*
    /// apartments only.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let apartment = sqlx::query_as::<_, Apartment>(&format!(
            "SELECT {} FROM apartments WHERE apartment_name = $1 AND ($2::uuid IS NULL OR id <> $2)",
            APARTMENT_COLUMNS
        ))
        .bind(name)
        .bind(excluding)
        .fetch_optional(pool)
        .await?;

        Ok(apartment)
    }

    /// Replaces the writable fields of an apartment
    ///
    /// Returns `None` if no apartment has that ID.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: ApartmentFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        let apartment = sqlx::query_as::<_, Apartment>(&format!(
            "UPDATE apartments
             SET apartment_name = $2, total_of_floors = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            APARTMENT_COLUMNS
        ))
        .bind(id)
        .bind(data.apartment_name)
        .bind(data.total_of_floors)
        .fetch_optional(pool)
        .await?;

        Ok(apartment)
    }

    /// Deletes an apartment only if no resident references it
    ///
    /// The row is locked with `FOR UPDATE` before residents are counted, so a
    /// concurrent resident insert (whose foreign-key check needs a share lock
    /// on the same row) waits until this transaction finishes.
    pub async fn delete_unreferenced(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<ApartmentDeletion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, Apartment>(&format!(
            "SELECT {} FROM apartments WHERE id = $1 FOR UPDATE",
            APARTMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(apartment) = existing else {
            tx.rollback().await?;
            return Ok(ApartmentDeletion::NotFound);
        };

        let (residents,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM residents WHERE apartment_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if residents > 0 {
            tx.rollback().await?;
            return Ok(ApartmentDeletion::Referenced { residents });
        }

        sqlx::query("DELETE FROM apartments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ApartmentDeletion::Deleted(apartment))
    }
}
