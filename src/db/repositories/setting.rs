use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::entities::settings;
use crate::settings::{SettingKey, SettingRow, SettingType};

pub struct SettingRepository {
    conn: DatabaseConnection,
}

impl SettingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_all(&self) -> Result<Vec<SettingRow>> {
        let models = settings::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to load settings")?;

        Ok(models
            .into_iter()
            .map(|m| SettingRow {
                key: SettingKey::parse(&m.key),
                value: m.value,
                value_type: SettingType::parse(&m.value_type),
            })
            .collect())
    }

    /// Upserts the whole batch inside one transaction so an interrupted
    /// save cannot leave a partially updated settings set.
    pub async fn upsert_all(&self, rows: &[SettingRow]) -> Result<()> {
        let txn = self.conn.begin().await.context("Failed to open settings transaction")?;

        for row in rows {
            let key = row.key.encode();
            let now = chrono::Utc::now().to_rfc3339();

            let existing = settings::Entity::find()
                .filter(settings::Column::Key.eq(&key))
                .one(&txn)
                .await
                .context("Failed to query setting for upsert")?;

            if let Some(model) = existing {
                let mut active: settings::ActiveModel = model.into();
                active.value = Set(row.value.clone());
                active.value_type = Set(row.value_type.as_str().to_string());
                active.updated_at = Set(now);
                active.update(&txn).await.context("Failed to update setting")?;
            } else {
                let active = settings::ActiveModel {
                    key: Set(key),
                    value: Set(row.value.clone()),
                    value_type: Set(row.value_type.as_str().to_string()),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&txn).await.context("Failed to insert setting")?;
            }
        }

        txn.commit().await.context("Failed to commit settings upsert")?;
        Ok(())
    }
}
