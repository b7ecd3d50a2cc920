/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/login`: exchange credentials for a bearer token
/// - `GET /signin`: dashboard sign-in page
/// - `POST /login`: dashboard sign-in, sets the session cookie
/// - `GET /logout`: ends the dashboard session
///
/// Both login forms accept `username`/`secret` as well as the short
/// `us`/`pw` names (and `password`).

use crate::{
    app::AppState,
    error::ApiResult,
    flash::{self, Flash},
    middleware::auth::{session_cookie, session_cookie_removal, SESSION_COOKIE},
    views,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use residence_shared::{auth::AuthError, models::account::AccountView};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use validator::Validate;

/// Login request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    /// Login name
    #[serde(alias = "us")]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Secret
    #[serde(alias = "pw", alias = "password")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub secret: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    /// The authenticated account
    pub user: AccountView,
}

/// Issues a bearer token
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "username": "admin", "secret": "123456789" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: malformed body or empty fields
/// - `401 Unauthorized`: unknown username or wrong secret
pub async fn api_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let account = state.auth.login(&req.username, &req.secret).await?;
    let token = state.auth.issue_token(&account)?;

    info!(account_id = %account.id, "Issued API token");

    Ok(Json(LoginResponse {
        token,
        user: AccountView::from(account),
    }))
}

/// Renders the sign-in page, or skips it when already signed in
pub async fn signin_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    if state.auth.resolve_session(token.as_deref()).await.is_ok() {
        return Redirect::to("/view/residents").into_response();
    }

    let (jar, flash) = flash::take(jar);
    (jar, views::signin(flash.as_ref())).into_response()
}

/// Dashboard sign-in
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(req): Form<LoginRequest>,
) -> Response {
    let session = if req.validate().is_err() {
        Err(AuthError::InvalidCredentials)
    } else {
        match state.auth.login(&req.username, &req.secret).await {
            Ok(account) => state.auth.open_session(&account).await,
            Err(e) => Err(e),
        }
    };

    match session {
        Ok(token) => {
            let cookie = session_cookie(
                token,
                state.auth.session_ttl(),
                state.config.api.production,
            );
            (jar.add(cookie), Redirect::to("/view/residents")).into_response()
        }
        Err(AuthError::InvalidCredentials) => flash::redirect(
            jar,
            Flash::error(AuthError::InvalidCredentials.to_string()),
            "/signin",
        ),
        Err(e) => {
            error!(error = %e, "Dashboard login failed");
            flash::redirect(jar, Flash::error("Login failed. Please try again."), "/signin")
        }
    }
}

/// Ends the dashboard session
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    if let Err(e) = state.auth.close_session(token.as_deref()).await {
        error!(error = %e, "Failed to close session");
    }

    (jar.remove(session_cookie_removal()), Redirect::to("/signin")).into_response()
}
