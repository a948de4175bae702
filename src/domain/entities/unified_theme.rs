use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use crate::entities::{
    background_theme::{SectionBackgrounds, ThemeImages},
    color_theme::{CustomStyles, ThemeColors},
    ornament::{Ornament, OrnamentInput},
    validation::validate_identifier,
};

#[derive(Debug, sqlx::FromRow)]
pub struct UnifiedThemeRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub colors: Json<ThemeColors>,
    pub custom_styles: Json<CustomStyles>,
    pub backgrounds: Json<SectionBackgrounds>,
    pub ornaments: Json<Vec<Ornament>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Colors, backgrounds and ornaments in one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedTheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
    pub custom_styles: CustomStyles,
    pub backgrounds: SectionBackgrounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ThemeImages>,
    pub ornaments: Vec<Ornament>,
    pub is_builtin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UnifiedThemeRow> for UnifiedTheme {
    fn from(row: UnifiedThemeRow) -> Self {
        UnifiedTheme {
            id: row.id,
            name: row.name,
            description: row.description,
            colors: row.colors.0,
            custom_styles: row.custom_styles.0,
            backgrounds: row.backgrounds.0,
            images: None,
            ornaments: row.ornaments.0,
            is_builtin: false,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

impl UnifiedTheme {
    pub fn without_ornaments(mut self) -> Self {
        self.ornaments.clear();
        self
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUnifiedThemeRequest {
    #[validate(
        length(min = 1, max = 64, message = "Theme ID is required"),
        custom(function = "validate_identifier")
    )]
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "Theme name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,

    #[validate(nested)]
    pub colors: ThemeColors,

    #[serde(default)]
    #[validate(nested)]
    pub custom_styles: CustomStyles,

    #[serde(default)]
    pub backgrounds: SectionBackgrounds,

    #[serde(default)]
    #[validate(nested)]
    pub ornaments: Vec<OrnamentInput>,
}

impl NewUnifiedThemeRequest {
    pub fn into_theme(self, now: DateTime<Utc>) -> UnifiedTheme {
        UnifiedTheme {
            id: self.id,
            name: self.name.trim().to_string(),
            description: self.description,
            colors: self.colors,
            custom_styles: self.custom_styles,
            backgrounds: self.backgrounds,
            images: None,
            ornaments: self.ornaments.into_iter().map(|o| o.into_ornament(now)).collect(),
            is_builtin: false,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnifiedThemeRequest {
    #[validate(length(min = 1, max = 64, message = "Theme ID is required"))]
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "Theme name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(nested)]
    pub colors: Option<ThemeColors>,

    #[validate(nested)]
    pub custom_styles: Option<CustomStyles>,

    pub backgrounds: Option<SectionBackgrounds>,

    /// Replaces the whole ornament list when present.
    #[validate(nested)]
    pub ornaments: Option<Vec<OrnamentInput>>,
}

impl UpdateUnifiedThemeRequest {
    pub fn apply_to(self, theme: &mut UnifiedTheme, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            theme.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            theme.description = description;
        }
        if let Some(colors) = self.colors {
            theme.colors = colors;
        }
        if let Some(styles) = self.custom_styles {
            theme.custom_styles = styles;
        }
        if let Some(backgrounds) = self.backgrounds {
            theme.backgrounds = backgrounds;
        }
        if let Some(ornaments) = self.ornaments {
            theme.ornaments = ornaments.into_iter().map(|o| o.into_ornament(now)).collect();
        }
        theme.updated_at = Some(now);
    }
}
