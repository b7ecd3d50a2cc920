/// Write drafts and validation rules
///
/// Drafts hold raw caller input exactly as it arrived (JSON body or HTML
/// form), with every field optional. Validation turns a draft into typed
/// fields or fails with the first broken rule.
///
/// # Resident rule order
///
/// 1. required fields present: name, floor, year of birth, description, apartment
/// 2. name matches `^[A-Za-z0-9 /]+$`
/// 3. floor is an integer in `[1, 40]`
/// 4. year of birth is an integer within [`BirthYearBounds`]
///
/// Rules 5 (name uniqueness) and 6 (apartment exists) need storage and run
/// in [`ResidentRegistry`](super::ResidentRegistry) after these pass.
///
/// # Example
///
/// ```
/// use residence_shared::registry::validation::{BirthYearBounds, IntegerInput, ResidentDraft};
///
/// let draft = ResidentDraft {
///     resident_name: Some("A/1".to_string()),
///     resident_description: None,
///     floor: None,
///     year_of_birth: Some(IntegerInput::from(1990)),
///     is_owned: None,
///     apartment: Some("b7d1c1f2-0000-4000-8000-000000000000".to_string()),
/// };
///
/// let err = draft.validate(&BirthYearBounds::default()).unwrap_err();
/// assert_eq!(err.to_string(), "Floor is required");
/// ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{RegistryError, RegistryResult};
use crate::models::apartment::ApartmentFields;

static RESIDENT_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 /]+$").expect("resident name pattern is valid"));

/// Lowest floor a resident may live on
pub const MIN_FLOOR: i64 = 1;

/// Highest floor a resident may live on
pub const MAX_FLOOR: i64 = 40;

/// Integer field as sent by a client
///
/// JSON clients send numbers; HTML forms send strings. Both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerInput {
    /// A JSON number
    Number(serde_json::Number),
    /// A string expected to hold a base-10 integer
    Text(String),
}

impl IntegerInput {
    /// Integer value, if the input is integral
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            IntegerInput::Number(n) => n.as_i64(),
            IntegerInput::Text(s) => s.trim().parse().ok(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, IntegerInput::Text(s) if s.trim().is_empty())
    }
}

impl From<i64> for IntegerInput {
    fn from(value: i64) -> Self {
        IntegerInput::Number(value.into())
    }
}

impl From<&str> for IntegerInput {
    fn from(value: &str) -> Self {
        IntegerInput::Text(value.to_string())
    }
}

/// Inclusive year-of-birth range accepted for residents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYearBounds {
    /// Earliest accepted year
    pub min: i32,
    /// Latest accepted year
    pub max: i32,
}

impl Default for BirthYearBounds {
    fn default() -> Self {
        Self {
            min: 1940,
            max: 2025,
        }
    }
}

impl BirthYearBounds {
    /// Whether `year` falls inside the range
    pub fn contains(&self, year: i64) -> bool {
        (i64::from(self.min)..=i64::from(self.max)).contains(&year)
    }
}

fn present_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn present_integer(value: &Option<IntegerInput>) -> Option<&IntegerInput> {
    value.as_ref().filter(|v| !v.is_blank())
}

/// Raw resident input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentDraft {
    pub resident_name: Option<String>,
    pub resident_description: Option<String>,
    pub floor: Option<IntegerInput>,
    #[serde(rename = "yOB")]
    pub year_of_birth: Option<IntegerInput>,
    pub is_owned: Option<bool>,
    /// Apartment ID as text; resolved by the registry
    pub apartment: Option<String>,
}

/// Resident input that passed the storage-free rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidResident {
    pub resident_name: String,
    pub resident_description: String,
    pub floor: i32,
    pub year_of_birth: i32,
    pub is_owned: bool,
    pub apartment: String,
}

impl ResidentDraft {
    /// Applies rules 1 through 4, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` naming the failing field.
    pub fn validate(&self, bounds: &BirthYearBounds) -> RegistryResult<ValidResident> {
        let name = present_text(&self.resident_name)
            .ok_or_else(|| RegistryError::validation("residentName", "Resident name is required"))?;
        let floor = present_integer(&self.floor)
            .ok_or_else(|| RegistryError::validation("floor", "Floor is required"))?;
        let year_of_birth = present_integer(&self.year_of_birth)
            .ok_or_else(|| RegistryError::validation("yOB", "Year of Birth is required"))?;
        let description = present_text(&self.resident_description).ok_or_else(|| {
            RegistryError::validation("residentDescription", "Resident description is required")
        })?;
        let apartment = present_text(&self.apartment)
            .ok_or_else(|| RegistryError::validation("apartment", "Apartment is required"))?;

        if !RESIDENT_NAME_PATTERN.is_match(name) {
            return Err(RegistryError::validation(
                "residentName",
                "Resident name can only contain letters, numbers, spaces, and forward slashes",
            ));
        }

        let floor = floor
            .as_integer()
            .filter(|f| (MIN_FLOOR..=MAX_FLOOR).contains(f))
            .ok_or_else(|| {
                RegistryError::validation(
                    "floor",
                    format!("Floor must be a number between {} and {}", MIN_FLOOR, MAX_FLOOR),
                )
            })?;

        let year_of_birth = year_of_birth
            .as_integer()
            .filter(|y| bounds.contains(*y))
            .ok_or_else(|| {
                RegistryError::validation(
                    "yOB",
                    format!(
                        "Year of Birth must be a number between {} and {}",
                        bounds.min, bounds.max
                    ),
                )
            })?;

        // Both ranges fit in i32 after the checks above
        Ok(ValidResident {
            resident_name: name.to_string(),
            resident_description: description.to_string(),
            floor: floor as i32,
            year_of_birth: year_of_birth as i32,
            is_owned: self.is_owned.unwrap_or(false),
            apartment: apartment.trim().to_string(),
        })
    }
}

/// Raw apartment input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentDraft {
    pub apartment_name: Option<String>,
    pub total_of_floors: Option<IntegerInput>,
}

impl ApartmentDraft {
    /// Requires a name and, when given, a positive floor count
    pub fn validate(&self) -> RegistryResult<ApartmentFields> {
        let name = present_text(&self.apartment_name).ok_or_else(|| {
            RegistryError::validation("apartmentName", "Apartment name is required")
        })?;

        let total_of_floors = match present_integer(&self.total_of_floors) {
            None => None,
            Some(input) => Some(
                input
                    .as_integer()
                    .filter(|n| *n >= 1)
                    .and_then(|n| i32::try_from(n).ok())
                    .ok_or_else(|| {
                        RegistryError::validation(
                            "totalOfFloors",
                            "Total of floors must be a positive number",
                        )
                    })?,
            ),
        };

        Ok(ApartmentFields {
            apartment_name: name.to_string(),
            total_of_floors,
        })
    }
}
