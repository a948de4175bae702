use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use crate::{
    entities::{section::Section, validation::validate_identifier},
    utils::image_data::{inspect_image_reference, ImageDataError, MAX_BACKGROUND_IMAGE_BYTES},
};

/// Per-section background images (data URLs or paths), keyed by section.
pub type SectionBackgrounds = BTreeMap<Section, String>;

/// Rejects any section image that is malformed or over the background limit.
pub fn inspect_backgrounds(backgrounds: &SectionBackgrounds) -> Result<(), ImageDataError> {
    for image in backgrounds.values() {
        inspect_image_reference(image, MAX_BACKGROUND_IMAGE_BYTES)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupleImages {
    pub bride: String,
    pub groom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeImages {
    pub hero: String,
    pub background: String,
    pub gallery: Vec<String>,
    pub couple: CoupleImages,
}

/// Compiled-in background set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundTheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub images: ThemeImages,
}

// ───── Custom background themes ─────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct CustomBackgroundThemeRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub backgrounds: Json<SectionBackgrounds>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBackgroundTheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub backgrounds: SectionBackgrounds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomBackgroundThemeRow> for CustomBackgroundTheme {
    fn from(row: CustomBackgroundThemeRow) -> Self {
        CustomBackgroundTheme {
            id: row.id,
            name: row.name,
            description: row.description,
            backgrounds: row.backgrounds.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One section image, for backgrounds too large to send together.
#[derive(Debug, Deserialize)]
pub struct SectionImageRequest {
    pub image: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewBackgroundThemeRequest {
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

    #[serde(default)]
    pub backgrounds: SectionBackgrounds,
}

impl NewBackgroundThemeRequest {
    pub fn into_theme(self, now: DateTime<Utc>) -> CustomBackgroundTheme {
        CustomBackgroundTheme {
            id: self.id,
            name: self.name.trim().to_string(),
            description: self.description,
            backgrounds: self.backgrounds,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBackgroundThemeRequest {
    #[validate(length(min = 1, max = 64, message = "Theme ID is required"))]
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "Theme name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    /// Replaces the whole map when present.
    pub backgrounds: Option<SectionBackgrounds>,
}

impl UpdateBackgroundThemeRequest {
    pub fn apply_to(self, theme: &mut CustomBackgroundTheme, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            theme.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            theme.description = description;
        }
        if let Some(backgrounds) = self.backgrounds {
            theme.backgrounds = backgrounds;
        }
        theme.updated_at = now;
    }
}
