use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::catalog::{CatalogFilter, CatalogTemplate},
    errors::AppError,
    repositories::sqlx_repo::{page_offset, SqlxRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_template(&self, template: &CatalogTemplate) -> Result<CatalogTemplate, AppError>;
    async fn get_template(&self, id: Uuid) -> Result<Option<CatalogTemplate>, AppError>;
    async fn list_templates(&self, filter: &CatalogFilter) -> Result<(Vec<CatalogTemplate>, i64), AppError>;
    async fn update_template(&self, template: &CatalogTemplate) -> Result<CatalogTemplate, AppError>;
    async fn delete_template(&self, id: Uuid) -> Result<bool, AppError>;
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    builder.push(" WHERE TRUE");
    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.trim().to_lowercase());
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", term);
        builder.push(" AND (title ILIKE ").push_bind(pattern.clone());
        builder.push(" OR description ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
impl CatalogRepository for SqlxRepo {
    async fn create_template(&self, template: &CatalogTemplate) -> Result<CatalogTemplate, AppError> {
        let pool = self.pool().await?;
        let created = sqlx::query_as::<_, CatalogTemplate>(
            r#"
            INSERT INTO catalog_templates (
                id, title, description, category, price, url, badge, image_base64, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(template.id)
        .bind(&template.title)
        .bind(&template.description)
        .bind(&template.category)
        .bind(template.price)
        .bind(&template.url)
        .bind(&template.badge)
        .bind(&template.image_base64)
        .bind(template.created_at)
        .bind(template.updated_at)
        .fetch_one(pool)
        .await?;
        Ok(created)
    }

    async fn get_template(&self, id: Uuid) -> Result<Option<CatalogTemplate>, AppError> {
        let pool = self.pool().await?;
        let template = sqlx::query_as::<_, CatalogTemplate>("SELECT * FROM catalog_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(template)
    }

    async fn list_templates(&self, filter: &CatalogFilter) -> Result<(Vec<CatalogTemplate>, i64), AppError> {
        let pool = self.pool().await?;

        let mut builder = QueryBuilder::new("SELECT * FROM catalog_templates");
        push_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(filter.per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(filter.page, filter.per_page));
        let templates = builder.build_query_as::<CatalogTemplate>().fetch_all(pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM catalog_templates");
        push_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

        Ok((templates, total))
    }

    async fn update_template(&self, template: &CatalogTemplate) -> Result<CatalogTemplate, AppError> {
        let pool = self.pool().await?;
        sqlx::query_as::<_, CatalogTemplate>(
            r#"
            UPDATE catalog_templates
            SET title = $2, description = $3, category = $4, price = $5, url = $6,
                badge = $7, image_base64 = $8, updated_at = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(template.id)
        .bind(&template.title)
        .bind(&template.description)
        .bind(&template.category)
        .bind(template.price)
        .bind(&template.url)
        .bind(&template.badge)
        .bind(&template.image_base64)
        .bind(template.updated_at)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Catalog template not found".into()))
    }

    async fn delete_template(&self, id: Uuid) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM catalog_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
