use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{
    validate_content_status, validate_id, validate_page_size, validate_required, validate_slug,
};
use super::{ApiError, ApiResponse, AppState, ProjectDto, ProjectListResponse, auth::require};
use crate::auth::Capability;
use crate::db::ProjectInput;

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub status: Option<String>,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub title: String,
    pub slug: String,
    pub client: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_status() -> String {
    "draft".to_string()
}

impl ProjectRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required("Title", &self.title)?;
        validate_slug(&self.slug)?;
        validate_content_status(&self.status)?;
        Ok(())
    }

    fn into_input(self) -> ProjectInput {
        ProjectInput {
            title: self.title,
            slug: self.slug,
            client: self.client,
            summary: self.summary,
            content: self.content,
            cover_image: self.cover_image,
            status: self.status,
            sort_order: self.sort_order,
        }
    }
}

/// GET /admin/projects
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<ApiResponse<ProjectListResponse>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewContent).await?;

    let page_size = validate_page_size(query.page_size)?;
    if let Some(status) = &query.status {
        validate_content_status(status)?;
    }

    let (projects, total_pages) = state
        .store()
        .list_projects(query.page.max(1), page_size, query.status.as_deref())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(ProjectListResponse {
        projects: projects.into_iter().map(ProjectDto::from).collect(),
        total_pages,
    })))
}

/// GET /admin/projects/{id}
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProjectDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewContent).await?;
    let id = validate_id(id)?;

    let project = state
        .store()
        .get_project(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Project", id))?;

    Ok(Json(ApiResponse::success(ProjectDto::from(project))))
}

/// POST /admin/projects
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<ProjectRequest>,
) -> Result<Json<ApiResponse<ProjectDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    payload.validate()?;

    if state
        .store()
        .project_slug_exists(&payload.slug, None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict(format!(
            "A project with slug '{}' already exists",
            payload.slug
        )));
    }

    let project = state
        .store()
        .create_project(payload.into_input())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(project_id = project.id, "project created");

    Ok(Json(ApiResponse::success(ProjectDto::from(project))))
}

/// PUT /admin/projects/{id}
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<ProjectRequest>,
) -> Result<Json<ApiResponse<ProjectDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    let id = validate_id(id)?;
    payload.validate()?;

    if state
        .store()
        .project_slug_exists(&payload.slug, Some(id))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict(format!(
            "A project with slug '{}' already exists",
            payload.slug
        )));
    }

    let project = state
        .store()
        .update_project(id, payload.into_input())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Project", id))?;

    Ok(Json(ApiResponse::success(ProjectDto::from(project))))
}

/// DELETE /admin/projects/{id}
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    let id = validate_id(id)?;

    let deleted = state
        .store()
        .delete_project(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Project", id));
    }

    Ok(Json(ApiResponse::success(())))
}
