/// Authentication primitives and the authentication service
///
/// # Modules
///
/// - [`password`]: Argon2id hashing for administrator secrets
/// - [`jwt`]: HS256 bearer tokens for the JSON API
/// - [`session`]: opaque dashboard cookie values and their storage hashes
/// - [`credentials`]: account creation, verification, and admin seeding
/// - [`service`]: [`AuthService`], the single entry point used by both the
///   dashboard and the API
///
/// # Example
///
/// ```
/// use residence_shared::auth::password::{hash_password, verify_password};
/// use residence_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("123456789")?;
/// assert!(verify_password("123456789", &hash)?);
///
/// let secret = "a-signing-secret-of-at-least-32-bytes!";
/// let token = create_token(&Claims::new(Uuid::new_v4()), secret)?;
/// validate_token(&token, secret)?;
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod jwt;
pub mod password;
pub mod service;
pub mod session;

pub use service::{AuthError, AuthService};
