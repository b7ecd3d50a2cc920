/// Apartment and resident registries
///
/// A registry owns validation and CRUD for one entity type. Both registries
/// are cheap to clone and share one [`Store`](crate::store::Store).
///
/// # Modules
///
/// - [`validation`]: raw write drafts and the ordered validation rules
/// - [`apartments`]: [`ApartmentRegistry`]
/// - [`residents`]: [`ResidentRegistry`]
///
/// # Error taxonomy
///
/// Every operation fails with a [`RegistryError`]. The first four variants
/// are caller mistakes and carry a user-facing message; `Password` and
/// `Store` are internal failures whose detail must not reach clients.

pub mod apartments;
pub mod residents;
pub mod validation;

pub use apartments::ApartmentRegistry;
pub use residents::ResidentRegistry;

use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Error type for registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A field is missing, malformed, or out of range
    #[error("{message}")]
    Validation {
        /// Wire name of the offending field
        field: &'static str,
        /// User-facing message
        message: String,
    },

    /// A uniqueness rule was violated
    #[error("{0}")]
    Conflict(String),

    /// The identifier does not resolve
    #[error("{0}")]
    NotFound(String),

    /// Apartment deletion blocked by referencing residents
    #[error("Cannot delete apartment with existing residents")]
    ApartmentInUse {
        /// Number of residents still referencing the apartment
        residents: i64,
    },

    /// Resident write references a nonexistent apartment
    #[error("Invalid apartment")]
    UnknownApartment,

    /// Secret hashing failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Builds a `Validation` error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        RegistryError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether this is one of the two referential-integrity failures
    pub fn is_referential(&self) -> bool {
        matches!(
            self,
            RegistryError::ApartmentInUse { .. } | RegistryError::UnknownApartment
        )
    }

    /// Whether this error is an internal failure rather than a caller mistake
    pub fn is_internal(&self) -> bool {
        matches!(self, RegistryError::Password(_) | RegistryError::Store(_))
    }
}

/// Registry result type alias
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RegistryError::validation("floor", "Floor is required").to_string(),
            "Floor is required"
        );
        assert_eq!(RegistryError::UnknownApartment.to_string(), "Invalid apartment");
        assert_eq!(
            RegistryError::ApartmentInUse { residents: 2 }.to_string(),
            "Cannot delete apartment with existing residents"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(RegistryError::UnknownApartment.is_referential());
        assert!(RegistryError::ApartmentInUse { residents: 1 }.is_referential());
        assert!(!RegistryError::Conflict("x".into()).is_referential());

        assert!(RegistryError::Store(StoreError::Database("down".into())).is_internal());
        assert!(!RegistryError::NotFound("x".into()).is_internal());
    }
}
