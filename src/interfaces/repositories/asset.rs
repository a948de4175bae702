use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    entities::asset::{AssetKind, LibraryAsset},
    errors::AppError,
    repositories::sqlx_repo::SqlxAssetRepo,
};

/// Storage for one asset library (ornaments, bank logos or music).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetRepository: Send + Sync {
    fn kind(&self) -> AssetKind;
    async fn create_asset(&self, asset: &LibraryAsset) -> Result<LibraryAsset, AppError>;
    async fn get_asset(&self, id: Uuid) -> Result<Option<LibraryAsset>, AppError>;
    async fn list_assets(&self, category: Option<String>) -> Result<Vec<LibraryAsset>, AppError>;
    async fn update_asset(&self, asset: &LibraryAsset) -> Result<LibraryAsset, AppError>;
    async fn delete_asset(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
impl AssetRepository for SqlxAssetRepo {
    fn kind(&self) -> AssetKind {
        self.kind
    }

    async fn create_asset(&self, asset: &LibraryAsset) -> Result<LibraryAsset, AppError> {
        let pool = self.db.pool().await?;
        let sql = format!(
            r#"
            INSERT INTO {} (id, name, category, data, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
            self.kind.table()
        );
        let created = sqlx::query_as::<_, LibraryAsset>(&sql)
            .bind(asset.id)
            .bind(&asset.name)
            .bind(&asset.category)
            .bind(&asset.data)
            .bind(Json(&asset.metadata.0))
            .bind(asset.created_at)
            .bind(asset.updated_at)
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    async fn get_asset(&self, id: Uuid) -> Result<Option<LibraryAsset>, AppError> {
        let pool = self.db.pool().await?;
        let sql = format!("SELECT * FROM {} WHERE id = $1", self.kind.table());
        let asset = sqlx::query_as::<_, LibraryAsset>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(asset)
    }

    async fn list_assets(&self, category: Option<String>) -> Result<Vec<LibraryAsset>, AppError> {
        let pool = self.db.pool().await?;
        let sql = format!(
            "SELECT * FROM {} WHERE ($1::TEXT IS NULL OR category = $1) ORDER BY created_at DESC",
            self.kind.table()
        );
        let assets = sqlx::query_as::<_, LibraryAsset>(&sql)
            .bind(category)
            .fetch_all(pool)
            .await?;
        Ok(assets)
    }

    async fn update_asset(&self, asset: &LibraryAsset) -> Result<LibraryAsset, AppError> {
        let pool = self.db.pool().await?;
        let sql = format!(
            r#"
            UPDATE {}
            SET name = $2, category = $3, data = $4, metadata = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
            self.kind.table()
        );
        sqlx::query_as::<_, LibraryAsset>(&sql)
            .bind(asset.id)
            .bind(&asset.name)
            .bind(&asset.category)
            .bind(&asset.data)
            .bind(Json(&asset.metadata.0))
            .bind(asset.updated_at)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {} with id {}", self.kind, asset.id)))
    }

    async fn delete_asset(&self, id: Uuid) -> Result<bool, AppError> {
        let pool = self.db.pool().await?;
        let sql = format!("DELETE FROM {} WHERE id = $1", self.kind.table());
        let result = sqlx::query(&sql).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
