use axum::{Json, extract::Multipart, extract::State};
use std::path::Path;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, UploadResponse, auth::require};
use crate::auth::Capability;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// POST /admin/uploads
/// Accepts one multipart `file` field and stores it under the configured
/// uploads directory, from where it is served back at /uploads/{name}.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    require(&session, state.permissions(), Capability::UploadFiles).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| ApiError::validation("Uploaded file must have a filename"))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(ApiError::validation("Uploaded file is empty"));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::validation(format!(
                "Uploaded file exceeds the {} MB limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let stored_name = format!("{}-{}", random_prefix(), sanitize_filename(&original_name));

        let uploads_dir = state.uploads_path();
        tokio::fs::create_dir_all(uploads_dir)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create uploads dir: {e}")))?;

        let dest = Path::new(uploads_dir).join(&stored_name);
        tokio::fs::write(&dest, &data)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store upload: {e}")))?;

        tracing::info!(file = %stored_name, size = data.len(), "file uploaded");

        return Ok(Json(ApiResponse::success(UploadResponse {
            path: format!("/uploads/{stored_name}"),
            size: data.len() as u64,
        })));
    }

    Err(ApiError::validation("Missing 'file' field in upload"))
}

/// Strips path components and anything outside a conservative charset so a
/// hostile filename cannot escape the uploads directory.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

fn random_prefix() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 4] = rng.random();

    bytes.iter().fold(String::with_capacity(8), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("a b?.png"), "a_b_.png");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename(r"C:\temp\shot.jpg"), "shot.jpg");
    }
}
