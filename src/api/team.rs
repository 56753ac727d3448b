use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{validate_id, validate_required};
use super::{ApiError, ApiResponse, AppState, TeamMemberDto, auth::require};
use crate::auth::Capability;
use crate::db::TeamMemberInput;

#[derive(Debug, Deserialize)]
pub struct TeamMemberRequest {
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl TeamMemberRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required("Name", &self.name)?;
        validate_required("Title", &self.title)?;
        Ok(())
    }

    fn into_input(self) -> TeamMemberInput {
        TeamMemberInput {
            name: self.name,
            title: self.title,
            bio: self.bio,
            image: self.image,
            sort_order: self.sort_order,
            is_active: self.is_active,
        }
    }
}

/// GET /admin/team
/// All members, active or not, in display order.
pub async fn list_team(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<Vec<TeamMemberDto>>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewContent).await?;

    let members = state
        .store()
        .list_team_members()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        members.into_iter().map(TeamMemberDto::from).collect(),
    )))
}

/// GET /admin/team/{id}
pub async fn get_team_member(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TeamMemberDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewContent).await?;
    let id = validate_id(id)?;

    let member = state
        .store()
        .get_team_member(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Team member", id))?;

    Ok(Json(ApiResponse::success(TeamMemberDto::from(member))))
}

/// POST /admin/team
pub async fn create_team_member(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<TeamMemberRequest>,
) -> Result<Json<ApiResponse<TeamMemberDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    payload.validate()?;

    let member = state
        .store()
        .create_team_member(payload.into_input())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(TeamMemberDto::from(member))))
}

/// PUT /admin/team/{id}
pub async fn update_team_member(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<TeamMemberRequest>,
) -> Result<Json<ApiResponse<TeamMemberDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    let id = validate_id(id)?;
    payload.validate()?;

    let member = state
        .store()
        .update_team_member(id, payload.into_input())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Team member", id))?;

    Ok(Json(ApiResponse::success(TeamMemberDto::from(member))))
}

/// DELETE /admin/team/{id}
pub async fn delete_team_member(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    let id = validate_id(id)?;

    let deleted = state
        .store()
        .delete_team_member(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Team member", id));
    }

    Ok(Json(ApiResponse::success(())))
}
