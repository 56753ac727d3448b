//! Public, unauthenticated surface.
//!
//! Everything here reads published content only; draft and archived
//! records are filtered out at the query layer, so they are unreachable no
//! matter what slug a visitor guesses.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_email, validate_page_size};
use super::{
    ApiError, ApiResponse, AppState, FieldIssue, MessageResponse, Pagination, ProjectDto,
    PublicPostDto, PublicPostListResponse, TeamMemberDto,
};

/// GET /public/posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PublicPostListResponse>>, ApiError> {
    let page_size = validate_page_size(pagination.page_size)?;

    let (posts, total_pages) = state
        .store()
        .list_published_posts(pagination.page.max(1), page_size)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(PublicPostListResponse {
        posts: posts.into_iter().map(PublicPostDto::from).collect(),
        total_pages,
    })))
}

/// GET /public/posts/{slug}
/// Unpublished posts 404 here even though the slug exists for admins.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PublicPostDto>>, ApiError> {
    let post = state
        .store()
        .get_published_post_by_slug(&slug)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Post", slug))?;

    Ok(Json(ApiResponse::success(PublicPostDto::from(post))))
}

/// GET /public/projects
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProjectDto>>>, ApiError> {
    let projects = state
        .store()
        .list_published_projects()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        projects.into_iter().map(ProjectDto::from).collect(),
    )))
}

/// GET /public/projects/{slug}
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProjectDto>>, ApiError> {
    let project = state
        .store()
        .get_published_project_by_slug(&slug)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Project", slug))?;

    Ok(Json(ApiResponse::success(ProjectDto::from(project))))
}

/// GET /public/team
/// Active members only, in display order.
pub async fn list_team(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TeamMemberDto>>>, ApiError> {
    let members = state
        .store()
        .list_active_team_members()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        members.into_iter().map(TeamMemberDto::from).collect(),
    )))
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
}

const MAX_MESSAGE_LEN: usize = 10_000;

/// POST /public/contact
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let name = payload.name.trim();
    let message = payload.message.trim();

    let mut issues = Vec::new();
    if name.is_empty() {
        issues.push(FieldIssue::new("name", "Name is required"));
    }
    if validate_email(&payload.email).is_err() {
        issues.push(FieldIssue::new("email", "Invalid email address"));
    }
    if message.is_empty() {
        issues.push(FieldIssue::new("message", "Message is required"));
    } else if message.len() > MAX_MESSAGE_LEN {
        issues.push(FieldIssue::new("message", "Message is too long"));
    }
    if !issues.is_empty() {
        return Err(ApiError::validation_fields("Invalid contact payload", issues));
    }

    state
        .store()
        .create_inquiry(name, &payload.email, payload.company.as_deref(), message)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!("contact inquiry received");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Thanks for reaching out. We'll get back to you shortly.".to_string(),
    })))
}
