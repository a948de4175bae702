use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::rsvp::{Rsvp, RsvpRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RsvpRepository: Send + Sync {
    async fn create_rsvp(&self, rsvp: &Rsvp) -> Result<Rsvp, AppError>;
    /// Newest first.
    async fn list_rsvps(&self, client_slug: &str) -> Result<Vec<Rsvp>, AppError>;
    async fn delete_rsvp(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
impl RsvpRepository for SqlxRepo {
    async fn create_rsvp(&self, rsvp: &Rsvp) -> Result<Rsvp, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, RsvpRow>(
            r#"
            INSERT INTO rsvps (id, client_slug, name, attendance, guest_count, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(rsvp.id)
        .bind(&rsvp.client_slug)
        .bind(&rsvp.name)
        .bind(rsvp.attendance.to_string())
        .bind(rsvp.guest_count)
        .bind(&rsvp.message)
        .bind(rsvp.created_at)
        .fetch_one(pool)
        .await?;
        row.try_into()
    }

    async fn list_rsvps(&self, client_slug: &str) -> Result<Vec<Rsvp>, AppError> {
        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, RsvpRow>(
            "SELECT * FROM rsvps WHERE client_slug = $1 ORDER BY created_at DESC",
        )
        .bind(client_slug)
        .fetch_all(pool)
        .await?;
        rows.into_iter().map(Rsvp::try_from).collect()
    }

    async fn delete_rsvp(&self, id: Uuid) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM rsvps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
