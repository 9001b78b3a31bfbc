/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use loanlead_api::{app::{build_router, AppState}, config::Config};
/// use loanlead_shared::auth::MemorySessionStore;
/// use loanlead_shared::db::pool::{create_pool, DatabaseConfig};
/// use loanlead_shared::storage::PgStorage;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(Arc::new(PgStorage::new(pool)), MemorySessionStore::new(), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use loanlead_shared::{
    auth::{signing_key, AuthService, MemorySessionStore},
    storage::Storage,
};
use std::sync::Arc;
use tower_sessions::{cookie::SameSite, SessionManagerLayer};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// User and lead store
    pub storage: Arc<dyn Storage>,

    /// Credential checks bound to request sessions
    pub auth: AuthService,

    /// Session records behind the session cookie
    pub sessions: MemorySessionStore,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state around an explicitly constructed session store
    pub fn new(storage: Arc<dyn Storage>, sessions: MemorySessionStore, config: Config) -> Self {
        let auth = AuthService::new(storage.clone(), config.session_max_age());

        Self {
            storage,
            auth,
            sessions,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                          # Health check (public)
/// └── /api/
///     ├── POST  /login, /auth/login         # Open a session (public)
///     ├── POST  /logout                     # Close the session
///     ├── GET   /auth/status                # Session status (public)
///     ├── POST  /leads                      # Submit a lead (public)
///     └── /admin/                           # Admin session required
///         ├── GET   /leads                  # All leads
///         ├── GET   /leads/filter           # Filtered leads
///         ├── GET   /leads/export           # CSV download
///         └── PATCH /leads/:id/status       # Update status
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Sessions (tower-sessions, signed `HttpOnly` `SameSite=Lax` cookie)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
/// 5. Admin gate (admin routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Admin routes (admin session required)
    let admin_routes = Router::new()
        .route("/leads", get(routes::admin::list_leads))
        .route("/leads/filter", get(routes::admin::filter_leads))
        .route("/leads/export", get(routes::admin::export_leads))
        .route("/leads/:id/status", patch(routes::admin::update_lead_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::session::require_admin,
        ));

    let api_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/auth/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/auth/status", get(routes::auth::status))
        .route("/leads", post(routes::leads::create_lead))
        .nest("/admin", admin_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
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
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let session_layer = SessionManagerLayer::new(state.sessions.clone())
        .with_name(state.config.session.cookie_name.clone())
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(state.config.api.production)
        .with_signed(signing_key(&state.config.session.secret));

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
