use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, PrincipalDto};
use crate::auth::{Capability, PermissionTable, Principal, SessionRecord};

/// Session-store key the auth record lives under.
const SESSION_KEY: &str = "auth";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Session verification & capability guard
// ============================================================================

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

async fn load_record(session: &Session) -> Result<SessionRecord, ApiError> {
    let record = session
        .get::<SessionRecord>(SESSION_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or(ApiError::Unauthenticated)?;

    let now = now_unix();

    if record.is_expired(now) {
        let _ = session.flush().await;
        return Err(ApiError::Unauthenticated);
    }

    // Sliding refresh: re-issue with a fresh window once the record is old
    // enough, keeping the original subject and role claim. The role is NOT
    // re-read from the database here.
    if record.needs_refresh(now) {
        let refreshed = record.refreshed(now);
        session
            .insert(SESSION_KEY, &refreshed)
            .await
            .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
        return Ok(refreshed);
    }

    Ok(record)
}

/// Verifies the session and returns its principal. A missing record is
/// treated identically to an invalid or expired one.
pub async fn verify_session(session: &Session) -> Result<Principal, ApiError> {
    Ok(load_record(session).await?.principal)
}

/// `verify_session` then a pure capability check. Every admin handler calls
/// this once, first, before touching persisted state.
pub async fn require(
    session: &Session,
    permissions: &PermissionTable,
    capability: Capability,
) -> Result<Principal, ApiError> {
    let principal = verify_session(session).await?;

    if !permissions.grants(principal.role, capability) {
        return Err(ApiError::forbidden(capability));
    }

    Ok(principal)
}

/// Authentication middleware for the admin route group. Capability checks
/// stay in the handlers; this only rejects requests with no valid session
/// so nothing downstream runs unauthenticated.
pub async fn auth_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let principal = verify_session(&session).await?;
    tracing::Span::current().record("user_id", principal.id);

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with email and password, establishes the session on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<PrincipalDto>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let principal = state
        .auth_service()
        .authenticate(&payload.email, &payload.password)
        .await?;

    let record = SessionRecord::issue(principal.clone(), now_unix());
    session
        .insert(SESSION_KEY, &record)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(ApiResponse::success(PrincipalDto::from(principal))))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
/// Get the current principal (requires a valid session)
pub async fn get_current_user(
    session: Session,
) -> Result<Json<ApiResponse<PrincipalDto>>, ApiError> {
    let principal = verify_session(&session).await?;
    Ok(Json(ApiResponse::success(PrincipalDto::from(principal))))
}
