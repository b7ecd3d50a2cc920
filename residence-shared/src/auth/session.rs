/// Dashboard session cookie values
///
/// A session cookie holds an opaque random value of the form
/// `rsid_{48 base62 chars}`. Only its SHA-256 hex digest is persisted, so a
/// leaked sessions table cannot be replayed as cookies.
///
/// # Example
///
/// ```
/// use residence_shared::auth::session::{
///     generate_session_token, hash_session_token, validate_session_token_format,
/// };
///
/// let (token, hash) = generate_session_token();
/// assert!(validate_session_token_format(&token));
/// assert_eq!(hash_session_token(&token), hash);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

const TOKEN_RANDOM_LENGTH: usize = 48;
const TOKEN_PREFIX: &str = "rsid_";

/// Total length of a session cookie value
pub const SESSION_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a session cookie value and its storage hash
///
/// Returns `(plaintext, sha256_hex)`.
pub fn generate_session_token() -> (String, String) {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let random: String = (0..TOKEN_RANDOM_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    let token = format!("{}{}", TOKEN_PREFIX, random);
    let hash = hash_session_token(&token);

    (token, hash)
}

/// Hex-encoded SHA-256 of a cookie value
pub fn hash_session_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Cheap structural check run before any storage lookup
pub fn validate_session_token_format(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH
        && token.starts_with(TOKEN_PREFIX)
        && token[TOKEN_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
}
