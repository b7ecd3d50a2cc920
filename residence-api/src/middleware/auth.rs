/// Request authentication
///
/// Two guards, one per front-end:
///
/// - [`require_token`]: JSON API. Reads `Authorization: Bearer <token>`;
///   missing tokens get 401, bad or expired ones 403.
/// - [`require_session`]: dashboard. Reads the session cookie; anything but a
///   live session redirects to `/signin` with a flash message.
///
/// Both insert a [`CurrentAccount`] into the request extensions.

use crate::{app::AppState, error::ApiError, flash::Flash};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use residence_shared::{auth::AuthError, models::account::AccountView};
use tracing::{error, warn};

/// Name of the dashboard session cookie
pub const SESSION_COOKIE: &str = "residence.sid";

/// Session cookie carrying `token`, living as long as the session row
pub fn session_cookie(token: String, ttl: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Cookie that, passed to `CookieJar::remove`, clears the session cookie
pub fn session_cookie_removal() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// The authenticated account for this request
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub AccountView);

/// Pulls the credential out of an `Authorization` header value
///
/// The scheme word is not checked; the token is whatever follows the first
/// space.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .split_once(' ')
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

/// Bearer-token guard for `/api` routes
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AuthError::MissingToken)?;

    let account = state.auth.authenticate_token(token).await.map_err(|e| {
        if e.is_internal() {
            error!(error = %e, "Token authentication failed");
        } else {
            warn!(reason = %e, "Rejected bearer token");
        }
        e
    })?;

    req.extensions_mut().insert(CurrentAccount(account));
    Ok(next.run(req).await)
}

/// Session guard for dashboard routes
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());

    match state.auth.resolve_session(token.as_deref()).await {
        Ok(account) => {
            req.extensions_mut().insert(CurrentAccount(account));
            next.run(req).await
        }
        Err(e) => {
            let flash = if e.is_internal() {
                error!(error = %e, "Session lookup failed");
                Flash::error("Authentication error")
            } else {
                Flash::error(AuthError::NoSession.to_string())
            };
            let jar = crate::flash::set(jar.remove(session_cookie_removal()), flash);
            (jar, Redirect::to("/signin")).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer xyz"), Some("xyz"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("rsid_abc".to_string(), chrono::Duration::seconds(3600), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "rsid_abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }
}
