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
use super::{ApiError, ApiResponse, AppState, PostDto, PostListResponse, auth::require};
use crate::auth::Capability;
use crate::db::{PostFilter, PostInput};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub status: Option<String>,
    pub search: Option<String>,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "draft".to_string()
}

impl PostRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required("Title", &self.title)?;
        validate_slug(&self.slug)?;
        validate_content_status(&self.status)?;
        Ok(())
    }

    fn into_input(self, author_id: Option<i32>) -> PostInput {
        PostInput {
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content: self.content,
            cover_image: self.cover_image,
            status: self.status,
            author_id,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /admin/posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<ApiResponse<PostListResponse>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewContent).await?;

    let page_size = validate_page_size(query.page_size)?;
    if let Some(status) = &query.status {
        validate_content_status(status)?;
    }

    let filter = PostFilter {
        status: query.status,
        search: query.search,
    };

    let (posts, total_pages) = state
        .store()
        .list_posts(query.page.max(1), page_size, &filter)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(PostListResponse {
        posts: posts.into_iter().map(PostDto::from).collect(),
        total_pages,
    })))
}

/// GET /admin/posts/{id}
/// Drafts and archived posts are visible here, unlike the public route.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PostDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewContent).await?;
    let id = validate_id(id)?;

    let post = state
        .store()
        .get_post(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Post", id))?;

    Ok(Json(ApiResponse::success(PostDto::from(post))))
}

/// POST /admin/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<PostRequest>,
) -> Result<Json<ApiResponse<PostDto>>, ApiError> {
    let principal = require(&session, state.permissions(), Capability::ManageContent).await?;
    payload.validate()?;

    if state
        .store()
        .post_slug_exists(&payload.slug, None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict(format!(
            "A post with slug '{}' already exists",
            payload.slug
        )));
    }

    let post = state
        .store()
        .create_post(payload.into_input(Some(principal.id)))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(post_id = post.id, "post created");

    Ok(Json(ApiResponse::success(PostDto::from(post))))
}

/// PUT /admin/posts/{id}
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<PostRequest>,
) -> Result<Json<ApiResponse<PostDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    let id = validate_id(id)?;
    payload.validate()?;

    if state
        .store()
        .post_slug_exists(&payload.slug, Some(id))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict(format!(
            "A post with slug '{}' already exists",
            payload.slug
        )));
    }

    let existing_author = state
        .store()
        .get_post(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Post", id))?
        .author_id;

    let post = state
        .store()
        .update_post(id, payload.into_input(existing_author))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Post", id))?;

    Ok(Json(ApiResponse::success(PostDto::from(post))))
}

/// DELETE /admin/posts/{id}
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    let id = validate_id(id)?;

    let deleted = state
        .store()
        .delete_post(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Post", id));
    }

    Ok(Json(ApiResponse::success(())))
}
