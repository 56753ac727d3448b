use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::auth::PermissionTable;
use crate::config::{Config, SecurityConfig};
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

mod assets;
pub mod auth;
mod error;
mod inquiries;
mod observability;
mod posts;
mod projects;
pub mod public;
mod settings;
mod system;
mod team;
mod types;
mod uploads;
mod users;
pub mod validation;

pub use error::{ApiError, FieldIssue};
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    /// Role→capability grants, built once at startup. Injected rather than
    /// global so tests can construct states with different tables.
    pub permissions: PermissionTable,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    #[must_use]
    pub fn auth_service(&self) -> &dyn AuthService {
        self.auth_service.as_ref()
    }

    #[must_use]
    pub const fn security(&self) -> &SecurityConfig {
        &self.config.security
    }

    #[must_use]
    pub fn uploads_path(&self) -> &str {
        &self.config.general.uploads_path
    }
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let auth_service = Arc::new(SeaOrmAuthService::new(store.clone()));

    Ok(Arc::new(AppState {
        config,
        store,
        auth_service,
        permissions: PermissionTable::with_default_grants(),
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let uploads_path = state.config.general.uploads_path.clone();
    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let secure_cookies = state.config.server.secure_cookies;

    let admin_routes = create_admin_router();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(8)));

    let api_router = Router::new()
        .nest("/admin", admin_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_current_user))
        .route("/public/posts", get(public::list_posts))
        .route("/public/posts/{slug}", get(public::get_post))
        .route("/public/projects", get(public::list_projects))
        .route("/public/projects/{slug}", get(public::get_project))
        .route("/public/team", get(public::list_team))
        .route("/public/contact", post(public::submit_contact))
        .route("/system/status", get(system::get_status))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .route("/system/metrics", get(observability::get_metrics))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(uploads_path),
        )
        .fallback(assets::serve_asset)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}

/// Every route in this group sits behind the session middleware; handlers
/// then enforce their own capability as the first thing they do.
fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(system::get_dashboard))
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}", put(users::update_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/settings", get(settings::get_settings))
        .route("/settings", put(settings::update_settings))
        .route("/posts", get(posts::list_posts))
        .route("/posts", post(posts::create_post))
        .route("/posts/{id}", get(posts::get_post))
        .route("/posts/{id}", put(posts::update_post))
        .route("/posts/{id}", delete(posts::delete_post))
        .route("/projects", get(projects::list_projects))
        .route("/projects", post(projects::create_project))
        .route("/projects/{id}", get(projects::get_project))
        .route("/projects/{id}", put(projects::update_project))
        .route("/projects/{id}", delete(projects::delete_project))
        .route("/team", get(team::list_team))
        .route("/team", post(team::create_team_member))
        .route("/team/{id}", get(team::get_team_member))
        .route("/team/{id}", put(team::update_team_member))
        .route("/team/{id}", delete(team::delete_team_member))
        .route("/inquiries", get(inquiries::list_inquiries))
        .route("/inquiries/{id}/read", put(inquiries::mark_inquiry_read))
        .route("/inquiries/{id}", delete(inquiries::delete_inquiry))
        .route(
            "/uploads",
            post(uploads::upload_file).layer(DefaultBodyLimit::max(12 * 1024 * 1024)),
        )
        .layer(middleware::from_fn(auth::auth_middleware))
}
