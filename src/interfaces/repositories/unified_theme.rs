use async_trait::async_trait;
use sqlx::types::Json;

use crate::{
    entities::unified_theme::{UnifiedTheme, UnifiedThemeRow},
    errors::AppError,
    repositories::sqlx_repo::{conflict_on_unique, SqlxRepo},
};

/// Custom unified themes only; built-ins come from the registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnifiedThemeRepository: Send + Sync {
    async fn create_unified_theme(&self, theme: &UnifiedTheme) -> Result<UnifiedTheme, AppError>;
    async fn get_unified_theme(&self, id: &str) -> Result<Option<UnifiedTheme>, AppError>;
    async fn list_unified_themes(&self) -> Result<Vec<UnifiedTheme>, AppError>;
    async fn update_unified_theme(&self, theme: &UnifiedTheme) -> Result<UnifiedTheme, AppError>;
    async fn delete_unified_theme(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
impl UnifiedThemeRepository for SqlxRepo {
    async fn create_unified_theme(&self, theme: &UnifiedTheme) -> Result<UnifiedTheme, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, UnifiedThemeRow>(
            r#"
            INSERT INTO unified_themes (
                id, name, description, colors, custom_styles, backgrounds, ornaments, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()), COALESCE($9, NOW()))
            RETURNING *
            "#,
        )
        .bind(&theme.id)
        .bind(&theme.name)
        .bind(&theme.description)
        .bind(Json(&theme.colors))
        .bind(Json(&theme.custom_styles))
        .bind(Json(&theme.backgrounds))
        .bind(Json(&theme.ornaments))
        .bind(theme.created_at)
        .bind(theme.updated_at)
        .fetch_one(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Theme ID already exists"))?;

        Ok(row.into())
    }

    async fn get_unified_theme(&self, id: &str) -> Result<Option<UnifiedTheme>, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, UnifiedThemeRow>("SELECT * FROM unified_themes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(UnifiedTheme::from))
    }

    async fn list_unified_themes(&self) -> Result<Vec<UnifiedTheme>, AppError> {
        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, UnifiedThemeRow>("SELECT * FROM unified_themes ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(UnifiedTheme::from).collect())
    }

    async fn update_unified_theme(&self, theme: &UnifiedTheme) -> Result<UnifiedTheme, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, UnifiedThemeRow>(
            r#"
            UPDATE unified_themes
            SET name = $2, description = $3, colors = $4, custom_styles = $5,
                backgrounds = $6, ornaments = $7, updated_at = COALESCE($8, NOW())
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(&theme.id)
        .bind(&theme.name)
        .bind(&theme.description)
        .bind(Json(&theme.colors))
        .bind(Json(&theme.custom_styles))
        .bind(Json(&theme.backgrounds))
        .bind(Json(&theme.ornaments))
        .bind(theme.updated_at)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Unified theme not found".into()))?;

        Ok(row.into())
    }

    async fn delete_unified_theme(&self, id: &str) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM unified_themes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
