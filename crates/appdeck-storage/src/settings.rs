use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

use crate::entities;

pub type SettingsResult<T> = Result<T, StorageError>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("db error: {0}")]
    Db(#[from] DbErr),
    #[error("serde json error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The persistence contract consumed by the assistant gateway: opaque
/// JSON values behind string keys. Deliberately nothing more.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> SettingsResult<Option<JsonValue>>;
    async fn put(&self, key: &str, value: JsonValue) -> SettingsResult<()>;
    async fn remove(&self, key: &str) -> SettingsResult<()>;
}

#[derive(Clone)]
pub struct SqlSettings {
    db: DatabaseConnection,
}

impl SqlSettings {
    pub async fn connect(dsn: &str) -> SettingsResult<Self> {
        let db = Database::connect(dsn).await?;
        Ok(Self { db })
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Entity-first schema sync; run once at bootstrap.
    pub async fn sync(&self) -> SettingsResult<()> {
        Schema::new(self.db.get_database_backend())
            .builder()
            .register(entities::Settings)
            .sync(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for SqlSettings {
    async fn get(&self, key: &str) -> SettingsResult<Option<JsonValue>> {
        let row = entities::Settings::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(|row| row.value_json))
    }

    async fn put(&self, key: &str, value: JsonValue) -> SettingsResult<()> {
        use entities::settings::Column;

        let active = entities::settings::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value_json: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(OffsetDateTime::now_utc()),
            ..Default::default()
        };
        entities::Settings::insert(active)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_columns([Column::ValueJson, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> SettingsResult<()> {
        entities::Settings::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
