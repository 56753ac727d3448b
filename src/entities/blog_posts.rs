use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub excerpt: Option<String>,

    pub content: String,

    pub cover_image: Option<String>,

    /// One of "draft", "published", "archived".
    pub status: String,

    /// Set when status transitions to "published", cleared when it leaves it.
    pub published_at: Option<String>,

    pub author_id: Option<i32>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
