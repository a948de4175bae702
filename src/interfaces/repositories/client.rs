use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    entities::client::{Client, ClientListQuery, ThemeSlot},
    errors::AppError,
    repositories::sqlx_repo::{conflict_on_unique, page_offset, SqlxRepo},
};

/// Rows owned by a client slug, removed together with the client.
const CLIENT_OWNED_TABLES: [&str; 3] = ["client_content", "guestbook_entries", "rsvps"];

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create_client(&self, client: &Client) -> Result<Client, AppError>;
    async fn client_slug_exists(&self, slug: &str) -> Result<bool, AppError>;
    async fn get_client_by_slug(&self, slug: &str) -> Result<Option<Client>, AppError>;
    async fn list_clients(&self, query: &ClientListQuery) -> Result<(Vec<Client>, i64), AppError>;
    async fn update_client(&self, client: &Client) -> Result<Client, AppError>;
    /// Deletes the client and everything stored under its slug.
    async fn delete_client(&self, slug: &str) -> Result<bool, AppError>;
    /// Clients assigned `theme_id` through the column for `slot`.
    async fn count_theme_references(&self, slot: ThemeSlot, theme_id: &str) -> Result<i64, AppError>;
}

fn push_search(builder: &mut QueryBuilder<'_, Postgres>, search: Option<&str>) {
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        builder.push(" WHERE slug ILIKE ").push_bind(format!("%{}%", term));
    }
}

#[async_trait]
impl ClientRepository for SqlxRepo {
    async fn create_client(&self, client: &Client) -> Result<Client, AppError> {
        let pool = self.pool().await?;
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                id, slug, theme, color_theme, background_theme, password_hash, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(&client.slug)
        .bind(&client.theme)
        .bind(&client.color_theme)
        .bind(&client.background_theme)
        .bind(&client.password_hash)
        .bind(client.created_at)
        .bind(client.updated_at)
        .fetch_one(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Slug already exists"))
    }

    async fn client_slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    async fn get_client_by_slug(&self, slug: &str) -> Result<Option<Client>, AppError> {
        let pool = self.pool().await?;
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(client)
    }

    async fn list_clients(&self, query: &ClientListQuery) -> Result<(Vec<Client>, i64), AppError> {
        let pool = self.pool().await?;

        let mut builder = QueryBuilder::new("SELECT * FROM clients");
        push_search(&mut builder, query.search.as_deref());
        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(query.per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(query.page, query.per_page));
        let clients = builder.build_query_as::<Client>().fetch_all(pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM clients");
        push_search(&mut count, query.search.as_deref());
        let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

        Ok((clients, total))
    }

    async fn update_client(&self, client: &Client) -> Result<Client, AppError> {
        let pool = self.pool().await?;
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET theme = $2, color_theme = $3, background_theme = $4, password_hash = $5, updated_at = $6
            WHERE slug = $1
            RETURNING *
            "#,
        )
        .bind(&client.slug)
        .bind(&client.theme)
        .bind(&client.color_theme)
        .bind(&client.background_theme)
        .bind(&client.password_hash)
        .bind(client.updated_at)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".into()))
    }

    async fn delete_client(&self, slug: &str) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM clients WHERE slug = $1")
            .bind(slug)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for table in CLIENT_OWNED_TABLES {
            let sql = format!("DELETE FROM {} WHERE client_slug = $1", table);
            sqlx::query(&sql).bind(slug).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn count_theme_references(&self, slot: ThemeSlot, theme_id: &str) -> Result<i64, AppError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT COUNT(*) FROM clients WHERE {} = $1", slot.column());
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(theme_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
