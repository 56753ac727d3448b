use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::blog_posts;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_ARCHIVED: &str = "archived";

/// Fields accepted by create/update. `published_at` is not among them:
/// it is derived from status transitions, never set by callers.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub status: String,
    pub author_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub status: Option<String>,
    pub search: Option<String>,
}

pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
        filter: &PostFilter,
    ) -> Result<(Vec<blog_posts::Model>, u64)> {
        let mut query = blog_posts::Entity::find().order_by_desc(blog_posts::Column::CreatedAt);

        if let Some(status) = &filter.status {
            query = query.filter(blog_posts::Column::Status.eq(status));
        }
        if let Some(search) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(blog_posts::Column::Title.contains(search))
                    .add(blog_posts::Column::Slug.contains(search)),
            );
        }

        let paginator = query.paginate(&self.conn, page_size);
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    /// Published posts only, newest first. This is the only listing the
    /// public surface may use.
    pub async fn list_published(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<blog_posts::Model>, u64)> {
        let paginator = blog_posts::Entity::find()
            .filter(blog_posts::Column::Status.eq(STATUS_PUBLISHED))
            .order_by_desc(blog_posts::Column::PublishedAt)
            .paginate(&self.conn, page_size);

        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    pub async fn get(&self, id: i32) -> Result<Option<blog_posts::Model>> {
        blog_posts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query post by id")
    }

    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Option<blog_posts::Model>> {
        blog_posts::Entity::find()
            .filter(blog_posts::Column::Slug.eq(slug))
            .filter(blog_posts::Column::Status.eq(STATUS_PUBLISHED))
            .one(&self.conn)
            .await
            .context("Failed to query published post by slug")
    }

    pub async fn slug_exists(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool> {
        let mut query = blog_posts::Entity::find().filter(blog_posts::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(blog_posts::Column::Id.ne(id));
        }

        Ok(query.count(&self.conn).await? > 0)
    }

    pub async fn create(&self, input: PostInput) -> Result<blog_posts::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let published_at = (input.status == STATUS_PUBLISHED).then(|| now.clone());

        let active = blog_posts::ActiveModel {
            title: Set(input.title),
            slug: Set(input.slug),
            excerpt: Set(input.excerpt),
            content: Set(input.content),
            cover_image: Set(input.cover_image),
            status: Set(input.status),
            published_at: Set(published_at),
            author_id: Set(input.author_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(&self.conn).await.context("Failed to insert post")
    }

    pub async fn update(&self, id: i32, input: PostInput) -> Result<Option<blog_posts::Model>> {
        let Some(post) = self.get(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();
        let was_published = post.status == STATUS_PUBLISHED;
        let will_publish = input.status == STATUS_PUBLISHED;

        // published_at tracks the transition into/out of "published" and
        // survives republish-free edits untouched.
        let published_at = match (was_published, will_publish) {
            (false, true) => Some(now.clone()),
            (_, false) => None,
            (true, true) => post.published_at.clone(),
        };

        let mut active: blog_posts::ActiveModel = post.into();
        active.title = Set(input.title);
        active.slug = Set(input.slug);
        active.excerpt = Set(input.excerpt);
        active.content = Set(input.content);
        active.cover_image = Set(input.cover_image);
        active.status = Set(input.status);
        active.published_at = Set(published_at);
        active.author_id = Set(input.author_id);
        active.updated_at = Set(now);

        let model = active.update(&self.conn).await.context("Failed to update post")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = blog_posts::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete post")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(blog_posts::Entity::find().count(&self.conn).await?)
    }

    pub async fn count_published(&self) -> Result<u64> {
        Ok(blog_posts::Entity::find()
            .filter(blog_posts::Column::Status.eq(STATUS_PUBLISHED))
            .count(&self.conn)
            .await?)
    }
}
