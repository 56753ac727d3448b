use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{blog_posts, contact_inquiries, projects, team_members};
use crate::settings::SettingRow;

pub mod migrator;
pub mod repositories;

pub use repositories::post::{PostFilter, PostInput};
pub use repositories::project::ProjectInput;
pub use repositories::team::TeamMemberInput;
pub use repositories::user::{NewUser, User, UserFilter, UserPatch};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("memory") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn setting_repo(&self) -> repositories::setting::SettingRepository {
        repositories::setting::SettingRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    fn project_repo(&self) -> repositories::project::ProjectRepository {
        repositories::project::ProjectRepository::new(self.conn.clone())
    }

    fn team_repo(&self) -> repositories::team::TeamRepository {
        repositories::team::TeamRepository::new(self.conn.clone())
    }

    fn inquiry_repo(&self) -> repositories::inquiry::InquiryRepository {
        repositories::inquiry::InquiryRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn list_users(
        &self,
        page: u64,
        page_size: u64,
        filter: &UserFilter,
    ) -> Result<(Vec<User>, u64)> {
        self.user_repo().list(page, page_size, filter).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<crate::entities::users::Model>> {
        self.user_repo().find_by_email(email).await
    }

    pub async fn user_email_exists(&self, email: &str, exclude_id: Option<i32>) -> Result<bool> {
        self.user_repo().email_exists(email, exclude_id).await
    }

    pub async fn create_user(&self, new_user: NewUser, security: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, security).await
    }

    pub async fn update_user(
        &self,
        id: i32,
        patch: UserPatch,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo().update(id, patch, security).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Settings ==========

    pub async fn get_settings(&self) -> Result<Vec<SettingRow>> {
        self.setting_repo().get_all().await
    }

    pub async fn upsert_settings(&self, rows: &[SettingRow]) -> Result<()> {
        self.setting_repo().upsert_all(rows).await
    }

    // ========== Blog posts ==========

    pub async fn list_posts(
        &self,
        page: u64,
        page_size: u64,
        filter: &PostFilter,
    ) -> Result<(Vec<blog_posts::Model>, u64)> {
        self.post_repo().list(page, page_size, filter).await
    }

    pub async fn list_published_posts(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<blog_posts::Model>, u64)> {
        self.post_repo().list_published(page, page_size).await
    }

    pub async fn get_post(&self, id: i32) -> Result<Option<blog_posts::Model>> {
        self.post_repo().get(id).await
    }

    pub async fn get_published_post_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<blog_posts::Model>> {
        self.post_repo().get_published_by_slug(slug).await
    }

    pub async fn post_slug_exists(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool> {
        self.post_repo().slug_exists(slug, exclude_id).await
    }

    pub async fn create_post(&self, input: PostInput) -> Result<blog_posts::Model> {
        self.post_repo().create(input).await
    }

    pub async fn update_post(&self, id: i32, input: PostInput) -> Result<Option<blog_posts::Model>> {
        self.post_repo().update(id, input).await
    }

    pub async fn delete_post(&self, id: i32) -> Result<bool> {
        self.post_repo().delete(id).await
    }

    pub async fn count_posts(&self) -> Result<u64> {
        self.post_repo().count().await
    }

    pub async fn count_published_posts(&self) -> Result<u64> {
        self.post_repo().count_published().await
    }

    // ========== Projects ==========

    pub async fn list_projects(
        &self,
        page: u64,
        page_size: u64,
        status: Option<&str>,
    ) -> Result<(Vec<projects::Model>, u64)> {
        self.project_repo().list(page, page_size, status).await
    }

    pub async fn list_published_projects(&self) -> Result<Vec<projects::Model>> {
        self.project_repo().list_published().await
    }

    pub async fn get_project(&self, id: i32) -> Result<Option<projects::Model>> {
        self.project_repo().get(id).await
    }

    pub async fn get_published_project_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<projects::Model>> {
        self.project_repo().get_published_by_slug(slug).await
    }

    pub async fn project_slug_exists(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool> {
        self.project_repo().slug_exists(slug, exclude_id).await
    }

    pub async fn create_project(&self, input: ProjectInput) -> Result<projects::Model> {
        self.project_repo().create(input).await
    }

    pub async fn update_project(
        &self,
        id: i32,
        input: ProjectInput,
    ) -> Result<Option<projects::Model>> {
        self.project_repo().update(id, input).await
    }

    pub async fn delete_project(&self, id: i32) -> Result<bool> {
        self.project_repo().delete(id).await
    }

    pub async fn count_projects(&self) -> Result<u64> {
        self.project_repo().count().await
    }

    // ========== Team members ==========

    pub async fn list_team_members(&self) -> Result<Vec<team_members::Model>> {
        self.team_repo().list_all().await
    }

    pub async fn list_active_team_members(&self) -> Result<Vec<team_members::Model>> {
        self.team_repo().list_active().await
    }

    pub async fn get_team_member(&self, id: i32) -> Result<Option<team_members::Model>> {
        self.team_repo().get(id).await
    }

    pub async fn create_team_member(
        &self,
        input: TeamMemberInput,
    ) -> Result<team_members::Model> {
        self.team_repo().create(input).await
    }

    pub async fn update_team_member(
        &self,
        id: i32,
        input: TeamMemberInput,
    ) -> Result<Option<team_members::Model>> {
        self.team_repo().update(id, input).await
    }

    pub async fn delete_team_member(&self, id: i32) -> Result<bool> {
        self.team_repo().delete(id).await
    }

    pub async fn count_active_team_members(&self) -> Result<u64> {
        self.team_repo().count_active().await
    }

    // ========== Contact inquiries ==========

    pub async fn create_inquiry(
        &self,
        name: &str,
        email: &str,
        company: Option<&str>,
        message: &str,
    ) -> Result<contact_inquiries::Model> {
        self.inquiry_repo().create(name, email, company, message).await
    }

    pub async fn list_inquiries(
        &self,
        page: u64,
        page_size: u64,
        unread_only: bool,
    ) -> Result<(Vec<contact_inquiries::Model>, u64)> {
        self.inquiry_repo().list(page, page_size, unread_only).await
    }

    pub async fn mark_inquiry_read(&self, id: i32) -> Result<bool> {
        self.inquiry_repo().mark_read(id).await
    }

    pub async fn delete_inquiry(&self, id: i32) -> Result<bool> {
        self.inquiry_repo().delete(id).await
    }

    pub async fn count_unread_inquiries(&self) -> Result<u64> {
        self.inquiry_repo().count_unread().await
    }
}
