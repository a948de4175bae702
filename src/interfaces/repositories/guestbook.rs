use async_trait::async_trait;
use uuid::Uuid;

use crate::{entities::guestbook::GuestbookEntry, errors::AppError, repositories::sqlx_repo::SqlxRepo};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestbookRepository: Send + Sync {
    async fn create_entry(&self, entry: &GuestbookEntry) -> Result<GuestbookEntry, AppError>;
    /// Newest first.
    async fn list_entries(&self, client_slug: &str) -> Result<Vec<GuestbookEntry>, AppError>;
    async fn delete_entry(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
impl GuestbookRepository for SqlxRepo {
    async fn create_entry(&self, entry: &GuestbookEntry) -> Result<GuestbookEntry, AppError> {
        let pool = self.pool().await?;
        let created = sqlx::query_as::<_, GuestbookEntry>(
            r#"
            INSERT INTO guestbook_entries (id, client_slug, name, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(&entry.client_slug)
        .bind(&entry.name)
        .bind(&entry.message)
        .bind(entry.created_at)
        .fetch_one(pool)
        .await?;
        Ok(created)
    }

    async fn list_entries(&self, client_slug: &str) -> Result<Vec<GuestbookEntry>, AppError> {
        let pool = self.pool().await?;
        let entries = sqlx::query_as::<_, GuestbookEntry>(
            "SELECT * FROM guestbook_entries WHERE client_slug = $1 ORDER BY created_at DESC",
        )
        .bind(client_slug)
        .fetch_all(pool)
        .await?;
        Ok(entries)
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM guestbook_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
