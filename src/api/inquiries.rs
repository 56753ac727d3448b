use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{validate_id, validate_page_size};
use super::{ApiError, ApiResponse, AppState, InquiryDto, InquiryListResponse, auth::require};
use crate::auth::Capability;

#[derive(Debug, Deserialize)]
pub struct ListInquiriesQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub unread_only: bool,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    20
}

/// GET /admin/inquiries
pub async fn list_inquiries(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<ListInquiriesQuery>,
) -> Result<Json<ApiResponse<InquiryListResponse>>, ApiError> {
    require(&session, state.permissions(), Capability::ViewDashboard).await?;

    let page_size = validate_page_size(query.page_size)?;

    let (inquiries, total_pages) = state
        .store()
        .list_inquiries(query.page.max(1), page_size, query.unread_only)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(InquiryListResponse {
        inquiries: inquiries.into_iter().map(InquiryDto::from).collect(),
        total_pages,
    })))
}

/// PUT /admin/inquiries/{id}/read
pub async fn mark_inquiry_read(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    let id = validate_id(id)?;

    let updated = state
        .store()
        .mark_inquiry_read(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !updated {
        return Err(ApiError::not_found("Inquiry", id));
    }

    Ok(Json(ApiResponse::success(())))
}

/// DELETE /admin/inquiries/{id}
pub async fn delete_inquiry(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require(&session, state.permissions(), Capability::ManageContent).await?;
    let id = validate_id(id)?;

    let deleted = state
        .store()
        .delete_inquiry(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Inquiry", id));
    }

    Ok(Json(ApiResponse::success(())))
}
