/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use residence_api::{app::{build_router, AppState}, config::Config};
/// use residence_shared::db::pool::{create_pool, DatabaseConfig};
/// use residence_shared::store::postgres::PgStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::from_url(config.database.url.clone())).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        auth::{require_session, require_token},
        security::SecurityHeadersLayer,
    },
    routes,
    views::ErrorPage,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use residence_shared::{
    auth::AuthService,
    registry::{ApartmentRegistry, ResidentRegistry},
    store::Store,
};
use std::{any::Any, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor; all fields
/// are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub store: Arc<dyn Store>,

    /// Credentials, sessions, and bearer tokens
    pub auth: AuthService,

    /// Apartment CRUD
    pub apartments: ApartmentRegistry,

    /// Resident CRUD
    pub residents: ResidentRegistry,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services over `store`
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            auth: AuthService::new(store.clone(), config.jwt.secret.as_str()),
            apartments: ApartmentRegistry::new(store.clone()),
            residents: ResidentRegistry::new(store.clone())
                .with_birth_years(config.residents.birth_years()),
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET  /                        → /signin
/// ├── GET  /health
/// ├── GET  /signin, POST /login, GET /logout
/// ├── /api
/// │   ├── POST /login               # public
/// │   ├── /apartments[/:id]         # bearer token
/// │   └── /residents[/:id]          # bearer token
/// └── dashboard                     # session cookie
///     ├── GET  /view/residents
///     ├── GET|POST /residents/add
///     ├── GET|POST /residents/:id
///     └── POST /residents/delete/:id
/// ```
///
/// Unknown paths render the 404 page; panics render the 500 page.
pub fn build_router(state: AppState) -> Router {
    let protected_api = Router::new()
        .route(
            "/apartments",
            get(routes::apartments::list_apartments).post(routes::apartments::create_apartment),
        )
        .route(
            "/apartments/:id",
            get(routes::apartments::get_apartment)
                .put(routes::apartments::update_apartment)
                .delete(routes::apartments::delete_apartment),
        )
        .route(
            "/residents",
            get(routes::residents::list_residents).post(routes::residents::create_resident),
        )
        .route(
            "/residents/:id",
            get(routes::residents::get_resident)
                .put(routes::residents::update_resident)
                .delete(routes::residents::delete_resident),
        )
        .route_layer(from_fn_with_state(state.clone(), require_token));

    let api_routes = Router::new()
        .route("/login", post(routes::auth::api_login))
        .merge(protected_api);

    let dashboard_routes = Router::new()
        .route("/view/residents", get(routes::dashboard::residents_page))
        .route(
            "/residents/add",
            get(routes::dashboard::add_resident_page).post(routes::dashboard::add_resident),
        )
        .route(
            "/residents/:id",
            get(routes::dashboard::edit_resident_page).post(routes::dashboard::edit_resident),
        )
        .route("/residents/delete/:id", post(routes::dashboard::delete_resident))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let public_routes = Router::new()
        .route("/", get(|| async { Redirect::to("/signin") }))
        .route("/health", get(routes::health::health_check))
        .route("/signin", get(routes::auth::signin_page))
        .route("/login", post(routes::auth::login))
        .route("/logout", get(routes::auth::logout));

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(dashboard_routes)
        .nest("/api", api_routes)
        .fallback(routes::not_found)
        .layer(CatchPanicLayer::custom(render_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn render_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");
    ErrorPage::server_error().into_response()
}
