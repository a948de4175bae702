use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;

use crate::{
    entities::content::{ContentRecord, ContentRow, ContentType},
    errors::AppError,
    repositories::sqlx_repo::SqlxRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn get_content(&self, client_slug: &str, content_type: ContentType) -> Result<Option<ContentRecord>, AppError>;
    async fn list_content(&self, client_slug: &str) -> Result<Vec<ContentRecord>, AppError>;
    /// Stores `data` as the whole blob.
    async fn replace_content(&self, client_slug: &str, content_type: ContentType, data: &Value) -> Result<ContentRecord, AppError>;
    /// Merges the top-level keys of `patch` into the stored blob in one statement.
    async fn merge_content(&self, client_slug: &str, content_type: ContentType, patch: &Value) -> Result<ContentRecord, AppError>;
    /// Deletes one blob, or all of them when `content_type` is `None`.
    async fn delete_content(&self, client_slug: &str, content_type: Option<ContentType>) -> Result<u64, AppError>;
}

#[async_trait]
impl ContentRepository for SqlxRepo {
    async fn get_content(&self, client_slug: &str, content_type: ContentType) -> Result<Option<ContentRecord>, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, ContentRow>(
            "SELECT * FROM client_content WHERE client_slug = $1 AND content_type = $2",
        )
        .bind(client_slug)
        .bind(content_type.to_string())
        .fetch_optional(pool)
        .await?;
        row.map(ContentRecord::try_from).transpose()
    }

    async fn list_content(&self, client_slug: &str) -> Result<Vec<ContentRecord>, AppError> {
        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, ContentRow>(
            "SELECT * FROM client_content WHERE client_slug = $1 ORDER BY content_type",
        )
        .bind(client_slug)
        .fetch_all(pool)
        .await?;
        rows.into_iter().map(ContentRecord::try_from).collect()
    }

    async fn replace_content(&self, client_slug: &str, content_type: ContentType, data: &Value) -> Result<ContentRecord, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            INSERT INTO client_content (client_slug, content_type, content_data, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (client_slug, content_type)
            DO UPDATE SET content_data = EXCLUDED.content_data, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(client_slug)
        .bind(content_type.to_string())
        .bind(Json(data))
        .fetch_one(pool)
        .await?;
        row.try_into()
    }

    async fn merge_content(&self, client_slug: &str, content_type: ContentType, patch: &Value) -> Result<ContentRecord, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            INSERT INTO client_content (client_slug, content_type, content_data, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (client_slug, content_type)
            DO UPDATE SET content_data = client_content.content_data || EXCLUDED.content_data, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(client_slug)
        .bind(content_type.to_string())
        .bind(Json(patch))
        .fetch_one(pool)
        .await?;
        row.try_into()
    }

    async fn delete_content(&self, client_slug: &str, content_type: Option<ContentType>) -> Result<u64, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query(
            "DELETE FROM client_content WHERE client_slug = $1 AND ($2::TEXT IS NULL OR content_type = $2)",
        )
        .bind(client_slug)
        .bind(content_type.map(|ct| ct.to_string()))
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
