use axum::{Json, extract::State};
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, auth::require};
use crate::auth::Capability;
use crate::settings::{flatten, unflatten};

/// GET /admin/settings
/// Returns the full settings object, grouped by category.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<Map<String, Value>>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageSettings).await?;

    let rows = state
        .store()
        .get_settings()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(unflatten(&rows))))
}

/// PUT /admin/settings
/// Accepts the nested object, flattens it and upserts the whole batch in
/// one transaction. Returns the stored state re-read from the database so
/// the client sees exactly what the codec persisted.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<ApiResponse<Map<String, Value>>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageSettings).await?;

    for (category, group) in &payload {
        if !group.is_object() {
            return Err(ApiError::validation(format!(
                "Category '{category}' must be an object of fields"
            )));
        }
    }

    let rows = flatten(&payload);
    state
        .store()
        .upsert_settings(&rows)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(keys = rows.len(), "settings updated");

    let stored = state
        .store()
        .get_settings()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(unflatten(&stored))))
}
