use std::sync::LazyLock;

use regex::Regex;

use super::ApiError;
use crate::auth::Role;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex"));

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid id: {}. Id must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    if !EMAIL_RE.is_match(email) {
        return Err(ApiError::validation(format!(
            "Invalid email address: {email}"
        )));
    }
    Ok(email)
}

/// Slugs are lowercase alphanumerics separated by single hyphens, which
/// keeps them URL-safe without percent-encoding.
pub fn validate_slug(slug: &str) -> Result<&str, ApiError> {
    if slug.is_empty() || slug.len() > 120 || !SLUG_RE.is_match(slug) {
        return Err(ApiError::validation(format!(
            "Invalid slug: '{slug}'. Use lowercase letters, digits and hyphens"
        )));
    }
    Ok(slug)
}

pub fn validate_role(role: &str) -> Result<Role, ApiError> {
    Role::parse(role)
        .ok_or_else(|| ApiError::validation(format!("Unknown role: '{role}'")))
}

pub fn validate_content_status(status: &str) -> Result<&str, ApiError> {
    match status {
        "draft" | "published" | "archived" => Ok(status),
        _ => Err(ApiError::validation(format!(
            "Invalid status: '{status}'. Use draft, published or archived"
        ))),
    }
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(password)
}

pub fn validate_page_size(page_size: u64) -> Result<u64, ApiError> {
    const MAX_PAGE_SIZE: u64 = 100;

    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ApiError::validation(format!(
            "Invalid page size: {}. Must be between 1 and {}",
            page_size, MAX_PAGE_SIZE
        )));
    }
    Ok(page_size)
}
