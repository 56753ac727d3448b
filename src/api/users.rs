use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{
    validate_email, validate_id, validate_page_size, validate_password, validate_required,
    validate_role,
};
use super::{
    ApiError, ApiResponse, AppState, FieldIssue, UserDto, UserListResponse, auth::require,
};
use crate::auth::Capability;
use crate::db::{NewUser, UserFilter, UserPatch};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    /// Omitting the password creates an account that cannot log in with
    /// credentials until an admin sets one.
    pub password: Option<String>,
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub image: Option<String>,
}

const fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub image: Option<Option<String>>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /admin/users
/// Paginated, filterable user listing. Never includes password material.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<UserListResponse>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewUsers).await?;

    let page_size = validate_page_size(query.page_size)?;
    if let Some(role) = &query.role {
        validate_role(role)?;
    }

    let filter = UserFilter {
        role: query.role,
        is_active: query.is_active,
        search: query.search,
    };

    let (users, total_pages) = state
        .store()
        .list_users(query.page.max(1), page_size, &filter)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(UserListResponse {
        users: users.into_iter().map(UserDto::from).collect(),
        total_pages,
    })))
}

/// GET /admin/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewUsers).await?;
    let id = validate_id(id)?;

    let user = state
        .store()
        .get_user(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// POST /admin/users
/// Creates a user; the password, if present, is hashed before storage.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageUsers).await?;

    // Collect every field problem so the form can annotate all of them in
    // one round trip.
    let mut issues = Vec::new();
    if payload.name.trim().is_empty() {
        issues.push(FieldIssue::new("name", "Name is required"));
    }
    if validate_email(&payload.email).is_err() {
        issues.push(FieldIssue::new("email", "Invalid email address"));
    }
    if validate_role(&payload.role).is_err() {
        issues.push(FieldIssue::new("role", format!("Unknown role: '{}'", payload.role)));
    }
    if let Some(password) = &payload.password
        && validate_password(password).is_err()
    {
        issues.push(FieldIssue::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if !issues.is_empty() {
        return Err(ApiError::validation_fields("Invalid user payload", issues));
    }

    let name = payload.name.trim().to_string();
    let role = validate_role(&payload.role)?;

    if state
        .store()
        .user_email_exists(&payload.email, None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict(format!(
            "A user with email '{}' already exists",
            payload.email
        )));
    }

    let user = state
        .store()
        .create_user(
            NewUser {
                name,
                email: payload.email,
                password: payload.password,
                role: role.as_str().to_string(),
                is_active: payload.is_active,
                image: payload.image,
            },
            state.security(),
        )
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(user_id = user.id, "user created");

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// PUT /admin/users/{id}
/// Updates a user. An actor can never change their own role or active
/// flag, regardless of capability.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let principal = require(&session, state.permissions(), Capability::ManageUsers).await?;
    let id = validate_id(id)?;

    if principal.id == id && (payload.role.is_some() || payload.is_active.is_some()) {
        return Err(ApiError::SelfModification);
    }

    if let Some(name) = &payload.name {
        validate_required("Name", name)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;

        if state
            .store()
            .user_email_exists(email, Some(id))
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?
        {
            return Err(ApiError::conflict(format!(
                "A user with email '{email}' already exists"
            )));
        }
    }
    if let Some(role) = &payload.role {
        validate_role(role)?;
    }
    if let Some(password) = &payload.password {
        validate_password(password)?;
    }

    let patch = UserPatch {
        name: payload.name,
        email: payload.email,
        password: payload.password,
        role: payload.role,
        is_active: payload.is_active,
        image: payload.image,
    };

    let user = state
        .store()
        .update_user(id, patch, state.security())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    tracing::info!(user_id = id, actor = principal.id, "user updated");

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// DELETE /admin/users/{id}
/// Hard delete. An actor can never delete their own account.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let principal = require(&session, state.permissions(), Capability::ManageUsers).await?;
    let id = validate_id(id)?;

    if principal.id == id {
        return Err(ApiError::SelfModification);
    }

    let deleted = state
        .store()
        .delete_user(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("User", id));
    }

    tracing::info!(user_id = id, actor = principal.id, "user deleted");

    Ok(Json(ApiResponse::success(())))
}
