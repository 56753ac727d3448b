use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default settings rows, one `(key, value, type)` triple per field.
///
/// `security_max_login_attempts` and `security_session_timeout` are stored
/// for the admin UI but not enforced anywhere yet; do not wire them up
/// without a design pass on lockout semantics.
const DEFAULT_SETTINGS: &[(&str, &str, &str)] = &[
    ("general_site_name", "Vitrine Consulting", "string"),
    ("general_tagline", "Software, done properly.", "string"),
    ("general_posts_per_page", "10", "number"),
    ("general_maintenance_mode", "false", "boolean"),
    ("contact_email", "hello@vitrine.local", "string"),
    ("contact_phone", "", "string"),
    ("social_links", r#"{"github":"","linkedin":"","x":""}"#, "json"),
    ("social_show_footer_icons", "true", "boolean"),
    ("seo_meta_title", "Vitrine Consulting", "string"),
    ("seo_meta_description", "", "string"),
    ("seo_keywords", r#"["software","consulting"]"#, "json"),
    ("security_max_login_attempts", "5", "number"),
    ("security_session_timeout", "480", "number"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        for (key, value, value_type) in DEFAULT_SETTINGS {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Settings)
                .columns([
                    crate::entities::settings::Column::Key,
                    crate::entities::settings::Column::Value,
                    crate::entities::settings::Column::ValueType,
                    crate::entities::settings::Column::UpdatedAt,
                ])
                .values_panic([
                    (*key).into(),
                    (*value).into(),
                    (*value_type).into(),
                    now.clone().into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (key, _, _) in DEFAULT_SETTINGS {
            let delete = sea_orm_migration::sea_query::Query::delete()
                .from_table(Settings)
                .and_where(Expr::col(crate::entities::settings::Column::Key).eq(*key))
                .to_owned();

            manager.exec_stmt(delete).await?;
        }

        Ok(())
    }
}
