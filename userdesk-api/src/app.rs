/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use userdesk_api::{app::{build_router, AppState}, config::Config};
/// use userdesk_shared::repository::InMemoryUserRepository;
/// use userdesk_shared::service::UserService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let users = UserService::new(Arc::new(InMemoryUserRepository::new()));
/// let app = build_router(AppState::new(users, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use userdesk_shared::service::UserService;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Both fields are reference-counted, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// User business service
    pub users: UserService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(users: UserService, config: Config) -> Self {
        Self {
            users,
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
/// ├── /health                        # Health check
/// └── /api/users/                    # User resource (see routes::users)
///     ├── GET, POST    /
///     ├── GET          /search, /lookup
///     ├── GET          /name/:name, /email/:email, /status/:status
///     ├── GET          /filter/active-list, /filter/inactive-list
///     ├── GET          /count/active-users
///     ├── GET, PUT, DELETE /:id
///     └── PATCH        /:id/activate, /:id/deactivate,
///                      /:id/name/:name, /:id/email/:email, /:id/phone/:phone
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes::users;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/search", get(users::search_users))
        .route("/lookup", get(users::lookup_user))
        .route("/name/:name", get(users::users_by_name))
        .route("/email/:email", get(users::users_by_email))
        .route("/status/:status", get(users::users_by_status))
        .route("/filter/active-list", get(users::active_users))
        .route("/filter/inactive-list", get(users::inactive_users))
        .route("/count/active-users", get(users::count_active_users))
        .route(
            "/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/:id/activate", patch(users::activate_user))
        .route("/:id/deactivate", patch(users::deactivate_user))
        .route("/:id/name/:name", patch(users::update_user_name))
        .route("/:id/email/:email", patch(users::update_user_email))
        .route("/:id/phone/:phone", patch(users::update_user_phone));

    let cors = cors_layer(&state.config.api.cors_origins);
    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .nest("/api/users", user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

/// CORS policy: permissive when `*` is listed, otherwise only the given origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
