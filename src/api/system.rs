//! System endpoints: status, health probes, and the admin dashboard counts.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse, response::Response};
use serde::Serialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, DashboardStats, SystemStatus, auth::require};
use crate::auth::Capability;

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReadinessChecks {
    pub database: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub checks: HealthReadinessChecks,
}

/// `GET /api/system/status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewDashboard).await?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
    })))
}

/// `GET /api/admin/dashboard`
/// Entity counts for the admin landing page.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewDashboard).await?;

    let store = state.store();
    let stats = DashboardStats {
        posts: store.count_posts().await.map_err(ApiError::from)?,
        published_posts: store.count_published_posts().await.map_err(ApiError::from)?,
        projects: store.count_projects().await.map_err(ApiError::from)?,
        team_members: store
            .count_active_team_members()
            .await
            .map_err(ApiError::from)?,
        users: store.count_users().await.map_err(ApiError::from)?,
        unread_inquiries: store
            .count_unread_inquiries()
            .await
            .map_err(ApiError::from)?,
    };

    Ok(Json(ApiResponse::success(stats)))
}

/// `GET /api/system/health/live`
///
/// Lightweight liveness probe to indicate the API process is running.
pub async fn health_live() -> impl IntoResponse {
    Json(ApiResponse::success(HealthLiveResponse { status: "alive" }))
}

/// `GET /api/system/health/ready`
///
/// Readiness probe that checks database connectivity.
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Response {
    let db_ready = state.store().ping().await.is_ok();

    let body = HealthReadyResponse {
        ready: db_ready,
        checks: HealthReadinessChecks { database: db_ready },
    };

    let status = if db_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ApiResponse::success(body))).into_response()
}
