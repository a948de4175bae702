use async_trait::async_trait;
use sqlx::types::Json;

use crate::{
    entities::color_theme::{CustomTheme, CustomThemeRow},
    errors::AppError,
    repositories::sqlx_repo::{conflict_on_unique, SqlxRepo},
};

const THEME_EXISTS: &str = "Theme ID already exists";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomThemeRepository: Send + Sync {
    async fn create_custom_theme(&self, theme: &CustomTheme) -> Result<CustomTheme, AppError>;
    async fn get_custom_theme(&self, theme_id: &str, include_backgrounds: bool) -> Result<Option<CustomTheme>, AppError>;
    async fn list_custom_themes(&self, include_backgrounds: bool) -> Result<Vec<CustomTheme>, AppError>;
    async fn update_custom_theme(&self, theme: &CustomTheme) -> Result<CustomTheme, AppError>;
    async fn delete_custom_theme(&self, theme_id: &str) -> Result<bool, AppError>;
}

const SELECT_THEME: &str = r#"
    SELECT theme_id, theme_name, description, colors, custom_styles,
           CASE WHEN $1 THEN backgrounds ELSE NULL END AS backgrounds,
           created_at, updated_at
    FROM custom_themes
"#;

#[async_trait]
impl CustomThemeRepository for SqlxRepo {
    async fn create_custom_theme(&self, theme: &CustomTheme) -> Result<CustomTheme, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, CustomThemeRow>(
            r#"
            INSERT INTO custom_themes (
                theme_id, theme_name, description, colors, custom_styles, backgrounds, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&theme.theme_id)
        .bind(&theme.theme_name)
        .bind(&theme.description)
        .bind(Json(&theme.colors))
        .bind(Json(&theme.custom_styles))
        .bind(theme.backgrounds.as_ref().map(Json))
        .bind(theme.created_at)
        .bind(theme.updated_at)
        .fetch_one(pool)
        .await
        .map_err(|e| conflict_on_unique(e, THEME_EXISTS))?;

        Ok(row.into())
    }

    async fn get_custom_theme(&self, theme_id: &str, include_backgrounds: bool) -> Result<Option<CustomTheme>, AppError> {
        let pool = self.pool().await?;
        let sql = format!("{} WHERE theme_id = $2", SELECT_THEME);
        let row = sqlx::query_as::<_, CustomThemeRow>(&sql)
            .bind(include_backgrounds)
            .bind(theme_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(CustomTheme::from))
    }

    async fn list_custom_themes(&self, include_backgrounds: bool) -> Result<Vec<CustomTheme>, AppError> {
        let pool = self.pool().await?;
        let sql = format!("{} ORDER BY created_at DESC", SELECT_THEME);
        let rows = sqlx::query_as::<_, CustomThemeRow>(&sql)
            .bind(include_backgrounds)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(CustomTheme::from).collect())
    }

    async fn update_custom_theme(&self, theme: &CustomTheme) -> Result<CustomTheme, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, CustomThemeRow>(
            r#"
            UPDATE custom_themes
            SET theme_name = $2, description = $3, colors = $4, custom_styles = $5,
                backgrounds = $6, updated_at = $7
            WHERE theme_id = $1
            RETURNING *
            "#,
        )
        .bind(&theme.theme_id)
        .bind(&theme.theme_name)
        .bind(&theme.description)
        .bind(Json(&theme.colors))
        .bind(Json(&theme.custom_styles))
        .bind(theme.backgrounds.as_ref().map(Json))
        .bind(theme.updated_at)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Theme not found".into()))?;

        Ok(row.into())
    }

    async fn delete_custom_theme(&self, theme_id: &str) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM custom_themes WHERE theme_id = $1")
            .bind(theme_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
