use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::contact_inquiries;

pub struct InquiryRepository {
    conn: DatabaseConnection,
}

impl InquiryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Records an inquiry submitted through the public contact form.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        company: Option<&str>,
        message: &str,
    ) -> Result<contact_inquiries::Model> {
        let active = contact_inquiries::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            company: Set(company.map(ToString::to_string)),
            message: Set(message.to_string()),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert contact inquiry")
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
        unread_only: bool,
    ) -> Result<(Vec<contact_inquiries::Model>, u64)> {
        let mut query = contact_inquiries::Entity::find()
            .order_by_desc(contact_inquiries::Column::CreatedAt);

        if unread_only {
            query = query.filter(contact_inquiries::Column::IsRead.eq(false));
        }

        let paginator = query.paginate(&self.conn, page_size);
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    pub async fn mark_read(&self, id: i32) -> Result<bool> {
        let Some(inquiry) = contact_inquiries::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query inquiry")?
        else {
            return Ok(false);
        };

        let mut active: contact_inquiries::ActiveModel = inquiry.into();
        active.is_read = Set(true);
        active.update(&self.conn).await.context("Failed to mark inquiry read")?;

        Ok(true)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = contact_inquiries::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete inquiry")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_unread(&self) -> Result<u64> {
        Ok(contact_inquiries::Entity::find()
            .filter(contact_inquiries::Column::IsRead.eq(false))
            .count(&self.conn)
            .await?)
    }
}
