use async_trait::async_trait;
use sqlx::types::Json;

use crate::{
    entities::background_theme::{CustomBackgroundTheme, CustomBackgroundThemeRow},
    errors::AppError,
    repositories::sqlx_repo::{conflict_on_unique, SqlxRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackgroundThemeRepository: Send + Sync {
    async fn create_background_theme(&self, theme: &CustomBackgroundTheme) -> Result<CustomBackgroundTheme, AppError>;
    async fn get_background_theme(&self, id: &str) -> Result<Option<CustomBackgroundTheme>, AppError>;
    async fn list_background_themes(&self) -> Result<Vec<CustomBackgroundTheme>, AppError>;
    async fn update_background_theme(&self, theme: &CustomBackgroundTheme) -> Result<CustomBackgroundTheme, AppError>;
    async fn delete_background_theme(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
impl BackgroundThemeRepository for SqlxRepo {
    async fn create_background_theme(&self, theme: &CustomBackgroundTheme) -> Result<CustomBackgroundTheme, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, CustomBackgroundThemeRow>(
            r#"
            INSERT INTO custom_background_themes (id, name, description, backgrounds, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&theme.id)
        .bind(&theme.name)
        .bind(&theme.description)
        .bind(Json(&theme.backgrounds))
        .bind(theme.created_at)
        .bind(theme.updated_at)
        .fetch_one(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Theme ID already exists"))?;

        Ok(row.into())
    }

    async fn get_background_theme(&self, id: &str) -> Result<Option<CustomBackgroundTheme>, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, CustomBackgroundThemeRow>("SELECT * FROM custom_background_themes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(CustomBackgroundTheme::from))
    }

    async fn list_background_themes(&self) -> Result<Vec<CustomBackgroundTheme>, AppError> {
        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, CustomBackgroundThemeRow>(
            "SELECT * FROM custom_background_themes ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(CustomBackgroundTheme::from).collect())
    }

    async fn update_background_theme(&self, theme: &CustomBackgroundTheme) -> Result<CustomBackgroundTheme, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, CustomBackgroundThemeRow>(
            r#"
            UPDATE custom_background_themes
            SET name = $2, description = $3, backgrounds = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(&theme.id)
        .bind(&theme.name)
        .bind(&theme.description)
        .bind(Json(&theme.backgrounds))
        .bind(theme.updated_at)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Background theme not found".into()))?;

        Ok(row.into())
    }

    async fn delete_background_theme(&self, id: &str) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM custom_background_themes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
