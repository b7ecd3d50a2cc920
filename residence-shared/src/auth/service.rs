/// Authentication service
///
/// One service, two front-ends over the same credential check:
///
/// - **Sessions** (dashboard): [`AuthService::open_session`] stores the hash
///   of a random cookie value with an absolute expiry; every request resolves
///   it through [`AuthService::resolve_session`]; logout deletes the row.
/// - **Tokens** (JSON API): [`AuthService::issue_token`] signs the account ID
///   into a JWT; [`AuthService::authenticate_token`] verifies it and looks the
///   account up again.
///
/// # Example
///
/// ```
/// use residence_shared::auth::service::AuthService;
/// use residence_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let auth = AuthService::new(
///     Arc::new(MemoryStore::new()),
///     "a-signing-secret-of-at-least-32-bytes!",
/// );
/// auth.credentials().create("admin", "123456789").await?;
///
/// let account = auth.login("admin", "123456789").await?;
/// let token = auth.issue_token(&account)?;
/// assert_eq!(auth.authenticate_token(&token).await?.username, "admin");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use super::credentials::{CredentialError, CredentialStore};
use super::jwt::{self, create_token, validate_token, Claims, JwtError};
use super::session::{generate_session_token, hash_session_token, validate_session_token_format};
use crate::models::account::{Account, AccountView};
use crate::models::session::NewSession;
use crate::store::{Store, StoreError};

/// Default dashboard session lifetime
pub fn default_session_ttl() -> Duration {
    Duration::seconds(3600)
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Username unknown or secret wrong
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No bearer token on an API request
    #[error("Access denied. No token provided.")]
    MissingToken,

    /// Bearer token failed signature, issuer, or format checks
    #[error("Invalid token")]
    InvalidToken,

    /// Bearer token past its expiry
    #[error("Token has expired")]
    TokenExpired,

    /// Token verified but its account no longer exists
    #[error("User not found")]
    UnknownAccount,

    /// Dashboard request without a live session
    #[error("Please log in to continue")]
    NoSession,

    /// Token signing failed
    #[error("Failed to issue token: {0}")]
    TokenIssue(String),

    /// Credential check failed internally
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Storage failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Whether this error is an internal failure rather than a rejection
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::TokenIssue(_) | AuthError::Credential(_) | AuthError::Store(_)
        )
    }
}

/// Issues and validates sessions and bearer tokens
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    credentials: CredentialStore,
    jwt_secret: Arc<str>,
    session_ttl: Duration,
    token_ttl: Duration,
}

impl AuthService {
    /// Creates a service signing tokens with `jwt_secret`
    pub fn new(store: Arc<dyn Store>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            credentials: CredentialStore::new(store.clone()),
            store,
            jwt_secret: jwt_secret.into(),
            session_ttl: default_session_ttl(),
            token_ttl: jwt::default_token_ttl(),
        }
    }

    /// Overrides the session lifetime
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Overrides the token lifetime
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Session lifetime, also used as the cookie max-age
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// The underlying credential store
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Verifies a username and secret
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for any mismatch.
    pub async fn login(&self, username: &str, secret: &str) -> Result<Account, AuthError> {
        match self.credentials.authenticate(username, secret).await? {
            Some(account) => Ok(account),
            None => {
                debug!(username, "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Signs a bearer token for `account`
    pub fn issue_token(&self, account: &Account) -> Result<String, AuthError> {
        let claims = Claims::with_expiration(account.id, self.token_ttl);
        create_token(&claims, &self.jwt_secret).map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Resolves a bearer token to its account
    ///
    /// # Errors
    ///
    /// `TokenExpired`, `InvalidToken`, or `UnknownAccount`.
    pub async fn authenticate_token(&self, token: &str) -> Result<AccountView, AuthError> {
        let claims = validate_token(token, &self.jwt_secret).map_err(|e| match e {
            JwtError::Expired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        self.store
            .account_by_id(claims.sub)
            .await?
            .map(AccountView::from)
            .ok_or(AuthError::UnknownAccount)
    }

    /// Opens a dashboard session, returning the cookie value
    ///
    /// Expired sessions are purged first.
    pub async fn open_session(&self, account: &Account) -> Result<String, AuthError> {
        let purged = self.store.purge_expired_sessions().await?;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }

        let (token, token_hash) = generate_session_token();
        self.store
            .insert_session(NewSession {
                token_hash,
                account_id: account.id,
                expires_at: Utc::now() + self.session_ttl,
            })
            .await?;

        info!(account_id = %account.id, "Session opened");
        Ok(token)
    }

    /// Resolves a session cookie value to its account
    ///
    /// # Errors
    ///
    /// `NoSession` when the cookie is absent, malformed, unknown, expired,
    /// or points at a deleted account.
    pub async fn resolve_session(&self, token: Option<&str>) -> Result<AccountView, AuthError> {
        let token = token
            .filter(|t| validate_session_token_format(t))
            .ok_or(AuthError::NoSession)?;
        let token_hash = hash_session_token(token);

        let session = self
            .store
            .session_by_hash(&token_hash)
            .await?
            .ok_or(AuthError::NoSession)?;

        if session.is_expired() {
            self.store.delete_session(&token_hash).await?;
            return Err(AuthError::NoSession);
        }

        self.store
            .account_by_id(session.account_id)
            .await?
            .map(AccountView::from)
            .ok_or(AuthError::NoSession)
    }

    /// Destroys a session; unknown or absent cookies are ignored
    pub async fn close_session(&self, token: Option<&str>) -> Result<(), AuthError> {
        if let Some(token) = token {
            if self.store.delete_session(&hash_session_token(token)).await? {
                info!("Session closed");
            }
        }
        Ok(())
    }
}
