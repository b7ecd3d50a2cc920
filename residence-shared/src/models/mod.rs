/// Database models for the residence manager
///
/// Each model owns its row type and the SQL that reads or writes it.
/// Higher layers never issue SQL directly; they go through [`crate::store`].
///
/// # Models
///
/// - `account`: Administrator credentials
/// - `apartment`: Apartment buildings
/// - `resident`: Residents and their apartment reference
/// - `session`: Server-side dashboard sessions
///
/// # Example
///
/// ```no_run
/// use residence_shared::models::apartment::{Apartment, ApartmentFields};
/// use residence_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let apartment = Apartment::create(
///     &pool,
///     ApartmentFields {
///         apartment_name: "Sunrise".to_string(),
///         total_of_floors: Some(12),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod apartment;
pub mod resident;
pub mod session;
