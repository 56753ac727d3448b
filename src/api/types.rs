use serde::{Deserialize, Serialize};

use super::error::FieldIssue;
use crate::auth::Principal;
use crate::db::User;
use crate::entities::{blog_posts, contact_inquiries, projects, team_members};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            details: None,
        }
    }

    pub fn error_with_details(message: impl Into<String>, fields: Vec<FieldIssue>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            details: Some(fields),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    20
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// The authenticated identity as returned by /auth/login and /auth/me.
#[derive(Debug, Serialize)]
pub struct PrincipalDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
    pub image: Option<String>,
}

impl From<Principal> for PrincipalDto {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            email: p.email,
            name: p.name,
            role: p.role.as_str().to_string(),
            image: p.image,
        }
    }
}

/// Admin view of a user. There is intentionally no password field here;
/// the repository never hands the hash out.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub image: Option<String>,
    pub has_password: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            is_active: u.is_active,
            image: u.image,
            has_password: u.has_password,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct PostDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub status: String,
    pub published_at: Option<String>,
    pub author_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<blog_posts::Model> for PostDto {
    fn from(m: blog_posts::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            excerpt: m.excerpt,
            content: m.content,
            cover_image: m.cover_image,
            status: m.status,
            published_at: m.published_at,
            author_id: m.author_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostDto>,
    pub total_pages: u64,
}

/// Public view of a post: no author id, no lifecycle fields.
#[derive(Debug, Serialize)]
pub struct PublicPostDto {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub published_at: Option<String>,
}

impl From<blog_posts::Model> for PublicPostDto {
    fn from(m: blog_posts::Model) -> Self {
        Self {
            title: m.title,
            slug: m.slug,
            excerpt: m.excerpt,
            content: m.content,
            cover_image: m.cover_image,
            published_at: m.published_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicPostListResponse {
    pub posts: Vec<PublicPostDto>,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct ProjectDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub client: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub status: String,
    pub sort_order: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<projects::Model> for ProjectDto {
    fn from(m: projects::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            client: m.client,
            summary: m.summary,
            content: m.content,
            cover_image: m.cover_image,
            status: m.status,
            sort_order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectDto>,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberDto {
    pub id: i32,
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl From<team_members::Model> for TeamMemberDto {
    fn from(m: team_members::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            title: m.title,
            bio: m.bio,
            image: m.image,
            sort_order: m.sort_order,
            is_active: m.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InquiryDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<contact_inquiries::Model> for InquiryDto {
    fn from(m: contact_inquiries::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            company: m.company,
            message: m.message,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InquiryListResponse {
    pub inquiries: Vec<InquiryDto>,
    pub total_pages: u64,
}

/// Entity counts backing the admin dashboard landing page.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub posts: u64,
    pub published_posts: u64,
    pub projects: u64,
    pub team_members: u64,
    pub users: u64,
    pub unread_inquiries: u64,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub path: String,
    pub size: u64,
}
