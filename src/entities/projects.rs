use sea_orm::entity::prelude::*;

/// Case study / portfolio entry shown on the public site.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub client: Option<String>,

    pub summary: Option<String>,

    pub content: String,

    pub cover_image: Option<String>,

    /// One of "draft", "published", "archived".
    pub status: String,

    pub sort_order: i32,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
