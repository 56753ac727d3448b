use sea_orm::entity::prelude::*;

/// Flat key/value row backing the nested settings object.
///
/// `key` is `<category>_<field>`; `value` is always stored as a string and
/// decoded according to `value_type` ("string" | "number" | "boolean" | "json").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub key: String,

    pub value: String,

    pub value_type: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
