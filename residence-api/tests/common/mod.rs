//! Shared helpers for the HTTP integration suites
//!
//! Every test gets its own router over a fresh in-memory store with the
//! default administrator seeded, so suites need no database.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use residence_api::app::{build_router, AppState};
use residence_api::config::Config;
use residence_shared::store::memory::MemoryStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "123456789";

/// Test context containing the router and its state
pub struct TestContext {
    pub app: axum::Router,
    pub state: AppState,
}

impl TestContext {
    /// Creates a context with default configuration
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Creates a context with extra configuration variables
    pub async fn with_env(extra: &[(&str, &str)]) -> Self {
        let vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgresql://unused/residence"),
            ("JWT_SECRET", JWT_SECRET),
        ]
        .iter()
        .chain(extra.iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_lookup(move |key: &str| vars.get(key).cloned()).unwrap();
        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        state
            .auth
            .credentials()
            .ensure_default_admin(&state.config.admin.username, &state.config.admin.password)
            .await
            .unwrap();

        TestContext {
            app: build_router(state.clone()),
            state,
        }
    }

    /// Sends one request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Logs in through the API and returns the bearer token
    pub async fn token(&self) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/login",
                None,
                serde_json::json!({"username": ADMIN_USERNAME, "secret": ADMIN_PASSWORD}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Signs in through the dashboard and returns the session cookie pair
    pub async fn session_cookie(&self) -> String {
        let response = self
            .send(form_request(
                "/login",
                None,
                &format!("username={}&password={}", ADMIN_USERNAME, ADMIN_PASSWORD),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/residents");
        cookie_pair(&response, "residence.sid").expect("login sets the session cookie")
    }

    /// Creates an apartment through the API, returning its ID
    pub async fn create_apartment(&self, token: &str, name: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/apartments",
                Some(token),
                serde_json::json!({"apartmentName": name, "totalOfFloors": 20}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }
}

/// JSON request, optionally with a bearer token
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Bodiless request, optionally with a bearer token
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Dashboard page request carrying cookies
pub fn page_request(uri: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

/// URL-encoded form post carrying cookies
pub fn form_request(uri: &str, cookies: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `name=value` of a cookie set by the response, if it is not a removal
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| {
            pair.split_once('=')
                .map(|(n, value)| n == name && !value.is_empty())
                .unwrap_or(false)
        })
        .map(str::to_string)
}
