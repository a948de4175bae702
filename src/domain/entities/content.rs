use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    entities::{section::Section, validation::validate_url_or_path},
    errors::AppError,
    utils::image_data::{inspect_image_reference, MAX_BACKGROUND_IMAGE_BYTES, MAX_BANK_LOGO_BYTES},
};

/// Closed set of content blobs a client can own.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[display("couple_info")]
    CoupleInfo,
    #[display("akad_info")]
    AkadInfo,
    #[display("resepsi_info")]
    ResepsiInfo,
    #[display("wedding_gift")]
    WeddingGift,
    #[display("love_story")]
    LoveStory,
    #[display("gift_visibility")]
    GiftVisibility,
    #[display("component_settings")]
    ComponentSettings,
    #[display("quote")]
    Quote,
    #[display("gallery")]
    Gallery,
    #[display("music")]
    Music,
}

impl ContentType {
    pub const ALL: [ContentType; 10] = [
        ContentType::CoupleInfo,
        ContentType::AkadInfo,
        ContentType::ResepsiInfo,
        ContentType::WeddingGift,
        ContentType::LoveStory,
        ContentType::GiftVisibility,
        ContentType::ComponentSettings,
        ContentType::Quote,
        ContentType::Gallery,
        ContentType::Music,
    ];
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.to_string() == value)
            .ok_or_else(|| format!("Unknown content type '{}'", value))
    }
}

// ───── Schemas ──────────────────────────────────────────────────────
// Every field is optional so the same schema checks full blobs and patches.

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CoupleInfo {
    #[validate(length(max = 100))]
    pub bride_name: Option<String>,
    #[validate(length(max = 200))]
    pub bride_full_name: Option<String>,
    #[validate(length(max = 300))]
    pub bride_parents: Option<String>,
    #[validate(length(max = 100))]
    pub bride_instagram: Option<String>,
    pub bride_photo: Option<String>,
    #[validate(length(max = 100))]
    pub groom_name: Option<String>,
    #[validate(length(max = 200))]
    pub groom_full_name: Option<String>,
    #[validate(length(max = 300))]
    pub groom_parents: Option<String>,
    #[validate(length(max = 100))]
    pub groom_instagram: Option<String>,
    pub groom_photo: Option<String>,
}

/// Shared by the akad (ceremony) and resepsi (reception) blobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventInfo {
    #[validate(length(max = 100))]
    pub date: Option<String>,
    #[validate(length(max = 50))]
    pub time: Option<String>,
    #[validate(length(max = 50))]
    pub end_time: Option<String>,
    #[validate(length(max = 200))]
    pub venue: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(custom(function = "validate_url_or_path"))]
    pub maps_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BankAccount {
    #[validate(length(min = 1, max = 100, message = "Bank name is required"))]
    pub bank_name: String,
    #[validate(length(min = 1, max = 50, message = "Account number is required"))]
    pub account_number: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub account_holder: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WeddingGift {
    #[validate(nested)]
    pub accounts: Option<Vec<BankAccount>>,
    #[validate(length(max = 150))]
    pub recipient: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StoryMoment {
    #[validate(length(max = 100))]
    pub date: Option<String>,
    #[validate(length(min = 1, max = 150, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoveStory {
    #[validate(length(max = 20000))]
    pub markdown: Option<String>,
    #[validate(nested)]
    pub timeline: Option<Vec<StoryMoment>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GiftVisibility {
    pub show_accounts: Option<bool>,
    pub show_address: Option<bool>,
}

/// Section visibility toggles; unknown sections fail to deserialize.
pub type ComponentSettings = BTreeMap<Section, bool>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Quote {
    #[validate(length(max = 1000))]
    pub text: Option<String>,
    #[validate(length(max = 200))]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Gallery {
    #[validate(length(max = 30, message = "At most 30 gallery images"))]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Music {
    #[validate(custom(function = "validate_url_or_path"))]
    pub url: Option<String>,
    #[validate(length(max = 150))]
    pub title: Option<String>,
    pub autoplay: Option<bool>,
    pub library_id: Option<uuid::Uuid>,
}

/// A content blob parsed into its typed schema.
#[derive(Debug, Clone)]
pub enum ContentData {
    CoupleInfo(CoupleInfo),
    AkadInfo(EventInfo),
    ResepsiInfo(EventInfo),
    WeddingGift(WeddingGift),
    LoveStory(LoveStory),
    GiftVisibility(GiftVisibility),
    ComponentSettings(ComponentSettings),
    Quote(Quote),
    Gallery(Gallery),
    Music(Music),
}

impl ContentData {
    /// Parses and validates a JSON object against the schema for `content_type`.
    pub fn parse(content_type: ContentType, value: &Value) -> Result<Self, AppError> {
        if !value.is_object() {
            return Err(AppError::InvalidInput("contentData must be a JSON object".into()));
        }

        let data = match content_type {
            ContentType::CoupleInfo => ContentData::CoupleInfo(typed(value)?),
            ContentType::AkadInfo => ContentData::AkadInfo(typed(value)?),
            ContentType::ResepsiInfo => ContentData::ResepsiInfo(typed(value)?),
            ContentType::WeddingGift => ContentData::WeddingGift(typed(value)?),
            ContentType::LoveStory => ContentData::LoveStory(typed(value)?),
            ContentType::GiftVisibility => ContentData::GiftVisibility(typed(value)?),
            ContentType::ComponentSettings => ContentData::ComponentSettings(typed(value)?),
            ContentType::Quote => ContentData::Quote(typed(value)?),
            ContentType::Gallery => ContentData::Gallery(typed(value)?),
            ContentType::Music => ContentData::Music(typed(value)?),
        };

        data.validate()?;
        Ok(data)
    }

    fn validate(&self) -> Result<(), AppError> {
        match self {
            ContentData::CoupleInfo(info) => {
                info.validate()?;
                for photo in [&info.bride_photo, &info.groom_photo].into_iter().flatten() {
                    inspect_image_reference(photo, MAX_BACKGROUND_IMAGE_BYTES)?;
                }
            }
            ContentData::AkadInfo(event) | ContentData::ResepsiInfo(event) => event.validate()?,
            ContentData::WeddingGift(gift) => {
                gift.validate()?;
                let logos = gift.accounts.iter().flatten().filter_map(|a| a.logo.as_deref());
                for logo in logos {
                    inspect_image_reference(logo, MAX_BANK_LOGO_BYTES)?;
                }
            }
            ContentData::LoveStory(story) => story.validate()?,
            ContentData::GiftVisibility(_) | ContentData::ComponentSettings(_) => {}
            ContentData::Quote(quote) => quote.validate()?,
            ContentData::Gallery(gallery) => {
                gallery.validate()?;
                for image in gallery.images.iter().flatten() {
                    inspect_image_reference(image, MAX_BACKGROUND_IMAGE_BYTES)?;
                }
            }
            ContentData::Music(music) => music.validate()?,
        }
        Ok(())
    }
}

fn typed<T: DeserializeOwned>(value: &Value) -> Result<T, AppError> {
    T::deserialize(value).map_err(|e| AppError::InvalidInput(format!("Invalid content: {}", e)))
}

// ───── Records & requests ───────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ContentRow {
    pub client_slug: String,
    pub content_type: String,
    pub content_data: sqlx::types::Json<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub client_slug: String,
    pub content_type: ContentType,
    pub content_data: Value,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentRecord {
    type Error = AppError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let content_type = row
            .content_type
            .parse()
            .map_err(|e: String| AppError::InternalError(format!("Stored content row is corrupt: {}", e)))?;
        Ok(ContentRecord {
            client_slug: row.client_slug,
            content_type,
            content_data: row.content_data.0,
            updated_at: row.updated_at,
        })
    }
}

impl ContentRecord {
    /// Decodes the stored blob into a schema type, or its default when it no longer fits.
    pub fn decode<T: DeserializeOwned + Default>(&self) -> T {
        T::deserialize(&self.content_data).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContentWriteRequest {
    #[validate(length(min = 1, max = 100, message = "Client slug is required"))]
    pub client_slug: String,
    pub content_type: ContentType,
    pub content_data: Value,
}

/// Shallow merge: top-level keys of `patch` overwrite those in `base`.
pub fn merge_objects(base: &Value, patch: &Value) -> Value {
    let mut merged: Map<String, Value> = base.as_object().cloned().unwrap_or_default();
    if let Some(patch) = patch.as_object() {
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_type_round_trips_through_strings() {
        for ct in ContentType::ALL {
            assert_eq!(ct.to_string().parse::<ContentType>().unwrap(), ct);
            assert_eq!(serde_json::to_value(ct).unwrap(), json!(ct.to_string()));
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ContentData::parse(ContentType::CoupleInfo, &json!({ "brideNmae": "Sari" })).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn partial_blob_is_accepted() {
        let parsed = ContentData::parse(ContentType::CoupleInfo, &json!({ "brideName": "Sari" })).unwrap();
        let ContentData::CoupleInfo(info) = parsed else { panic!("wrong variant") };
        assert_eq!(info.bride_name.as_deref(), Some("Sari"));
        assert!(info.groom_name.is_none());
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(ContentData::parse(ContentType::Quote, &json!(["text"])).is_err());
    }

    #[test]
    fn component_settings_only_accept_known_sections() {
        assert!(ContentData::parse(ContentType::ComponentSettings, &json!({ "gallery": false })).is_ok());
        assert!(ContentData::parse(ContentType::ComponentSettings, &json!({ "sidebar": false })).is_err());
    }

    #[test]
    fn bank_account_requires_number() {
        let err = ContentData::parse(
            ContentType::WeddingGift,
            &json!({ "accounts": [{ "bankName": "BCA", "accountNumber": "" }] }),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn merge_overwrites_only_patched_keys() {
        let merged = merge_objects(&json!({ "brideName": "Sari", "groomName": "Budi" }), &json!({ "groomName": "Bayu" }));
        assert_eq!(merged, json!({ "brideName": "Sari", "groomName": "Bayu" }));
    }
}
