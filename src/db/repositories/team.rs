use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::team_members;

#[derive(Debug, Clone)]
pub struct TeamMemberInput {
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

pub struct TeamRepository {
    conn: DatabaseConnection,
}

impl TeamRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<team_members::Model>> {
        team_members::Entity::find()
            .order_by_asc(team_members::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list team members")
    }

    pub async fn list_active(&self) -> Result<Vec<team_members::Model>> {
        team_members::Entity::find()
            .filter(team_members::Column::IsActive.eq(true))
            .order_by_asc(team_members::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list active team members")
    }

    pub async fn get(&self, id: i32) -> Result<Option<team_members::Model>> {
        team_members::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query team member by id")
    }

    pub async fn create(&self, input: TeamMemberInput) -> Result<team_members::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = team_members::ActiveModel {
            name: Set(input.name),
            title: Set(input.title),
            bio: Set(input.bio),
            image: Set(input.image),
            sort_order: Set(input.sort_order),
            is_active: Set(input.is_active),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert team member")
    }

    pub async fn update(
        &self,
        id: i32,
        input: TeamMemberInput,
    ) -> Result<Option<team_members::Model>> {
        let Some(member) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: team_members::ActiveModel = member.into();
        active.name = Set(input.name);
        active.title = Set(input.title);
        active.bio = Set(input.bio);
        active.image = Set(input.image);
        active.sort_order = Set(input.sort_order);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update team member")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = team_members::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete team member")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_active(&self) -> Result<u64> {
        Ok(team_members::Entity::find()
            .filter(team_members::Column::IsActive.eq(true))
            .count(&self.conn)
            .await?)
    }
}
