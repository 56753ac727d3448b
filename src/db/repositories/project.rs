use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::projects;

use super::post::STATUS_PUBLISHED;

#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub title: String,
    pub slug: String,
    pub client: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub status: String,
    pub sort_order: i32,
}

pub struct ProjectRepository {
    conn: DatabaseConnection,
}

impl ProjectRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
        status: Option<&str>,
    ) -> Result<(Vec<projects::Model>, u64)> {
        let mut query = projects::Entity::find()
            .order_by_asc(projects::Column::SortOrder)
            .order_by_desc(projects::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(projects::Column::Status.eq(status));
        }

        let paginator = query.paginate(&self.conn, page_size);
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    pub async fn list_published(&self) -> Result<Vec<projects::Model>> {
        projects::Entity::find()
            .filter(projects::Column::Status.eq(STATUS_PUBLISHED))
            .order_by_asc(projects::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list published projects")
    }

    pub async fn get(&self, id: i32) -> Result<Option<projects::Model>> {
        projects::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query project by id")
    }

    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Option<projects::Model>> {
        projects::Entity::find()
            .filter(projects::Column::Slug.eq(slug))
            .filter(projects::Column::Status.eq(STATUS_PUBLISHED))
            .one(&self.conn)
            .await
            .context("Failed to query published project by slug")
    }

    pub async fn slug_exists(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool> {
        let mut query = projects::Entity::find().filter(projects::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(projects::Column::Id.ne(id));
        }

        Ok(query.count(&self.conn).await? > 0)
    }

    pub async fn create(&self, input: ProjectInput) -> Result<projects::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = projects::ActiveModel {
            title: Set(input.title),
            slug: Set(input.slug),
            client: Set(input.client),
            summary: Set(input.summary),
            content: Set(input.content),
            cover_image: Set(input.cover_image),
            status: Set(input.status),
            sort_order: Set(input.sort_order),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert project")
    }

    pub async fn update(&self, id: i32, input: ProjectInput) -> Result<Option<projects::Model>> {
        let Some(project) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: projects::ActiveModel = project.into();
        active.title = Set(input.title);
        active.slug = Set(input.slug);
        active.client = Set(input.client);
        active.summary = Set(input.summary);
        active.content = Set(input.content);
        active.cover_image = Set(input.cover_image);
        active.status = Set(input.status);
        active.sort_order = Set(input.sort_order);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update project")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = projects::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete project")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(projects::Entity::find().count(&self.conn).await?)
    }
}
