use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{option_fields::OptionField, validation::validate_url_or_path},
    errors::AppError,
    utils::image_data::{inspect_image_reference, MAX_BANK_LOGO_BYTES, MAX_ORNAMENT_IMAGE_BYTES},
};

/// The three reusable asset libraries. Each lives in its own table.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    #[display("ornament")]
    OrnamentLibrary,
    #[display("bank logo")]
    BankLogo,
    #[display("music track")]
    Music,
}

impl AssetKind {
    pub fn table(self) -> &'static str {
        match self {
            AssetKind::OrnamentLibrary => "ornament_library",
            AssetKind::BankLogo => "bank_logos",
            AssetKind::Music => "music_library",
        }
    }

    /// Ornaments and logos carry image data; music carries a URL or path.
    pub fn check_data(self, data: &str) -> Result<(), AppError> {
        match self {
            AssetKind::OrnamentLibrary => inspect_image_reference(data, MAX_ORNAMENT_IMAGE_BYTES)?,
            AssetKind::BankLogo => inspect_image_reference(data, MAX_BANK_LOGO_BYTES)?,
            AssetKind::Music => validate_url_or_path(data.trim()).map_err(|e| {
                AppError::InvalidInput(
                    e.message
                        .map(|m| format!("Music file: {}", m))
                        .unwrap_or_else(|| "Invalid music file location".into()),
                )
            })?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LibraryAsset {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub data: String,
    pub metadata: sqlx::types::Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,

    #[serde(alias = "image", alias = "imageBase64", alias = "logo", alias = "filePath", alias = "url")]
    #[validate(length(min = 1, message = "Asset data is required"))]
    pub data: String,

    #[serde(default)]
    pub metadata: Option<Value>,
}

impl NewAssetRequest {
    pub fn into_asset(self, now: DateTime<Utc>) -> LibraryAsset {
        LibraryAsset {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            category: self.category.map(|c| c.trim().to_lowercase()),
            data: self.data.trim().to_string(),
            metadata: sqlx::types::Json(self.metadata.unwrap_or_else(|| Value::Object(Default::default()))),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[serde(default)]
    pub category: OptionField<String>,

    #[serde(alias = "image", alias = "imageBase64", alias = "logo", alias = "filePath", alias = "url")]
    #[validate(length(min = 1, message = "Asset data cannot be empty"))]
    pub data: Option<String>,

    pub metadata: Option<Value>,
}

impl UpdateAssetRequest {
    pub fn apply_to(self, asset: &mut LibraryAsset, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            asset.name = name.trim().to_string();
        }
        asset.category = self
            .category
            .apply_to(asset.category.take())
            .map(|c| c.trim().to_lowercase());
        if let Some(data) = self.data {
            asset.data = data.trim().to_string();
        }
        if let Some(metadata) = self.metadata {
            asset.metadata = sqlx::types::Json(metadata);
        }
        asset.updated_at = now;
    }
}

/// Metadata must be a JSON object when present.
pub fn check_metadata(metadata: Option<&Value>) -> Result<(), AppError> {
    match metadata {
        None | Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(AppError::InvalidInput("metadata must be a JSON object".into())),
    }
}
