use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::option_fields::OptionField;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub slug: String,
    /// Unified theme id (custom or built-in).
    pub theme: Option<String>,
    pub color_theme: Option<String>,
    pub background_theme: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which client column a kind of theme is assigned through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSlot {
    Unified,
    Color,
    Background,
}

impl ThemeSlot {
    pub fn column(self) -> &'static str {
        match self {
            ThemeSlot::Unified => "theme",
            ThemeSlot::Color => "color_theme",
            ThemeSlot::Background => "background_theme",
        }
    }
}

impl Client {
    pub fn references_theme(&self, slot: ThemeSlot, theme_id: &str) -> bool {
        let assigned = match slot {
            ThemeSlot::Unified => &self.theme,
            ThemeSlot::Color => &self.color_theme,
            ThemeSlot::Background => &self.background_theme,
        };
        assigned.as_deref() == Some(theme_id)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 100, message = "Slug is required"))]
    pub slug: String,

    #[validate(length(min = 1, max = 64))]
    pub theme: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub color_theme: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub background_theme: Option<String>,

    #[validate(length(min = 4, max = 128, message = "Password must be between 4 and 128 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientResponse {
    pub client: Client,
    pub slug: String,
    pub original_slug: String,
    pub was_modified: bool,
    /// Only present when the server generated the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

/// Theme reassignment and password reset for an existing client.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 100, message = "Slug is required"))]
    pub slug: String,

    #[serde(default)]
    pub theme: OptionField<String>,

    #[serde(default)]
    pub color_theme: OptionField<String>,

    #[serde(default)]
    pub background_theme: OptionField<String>,

    #[validate(length(min = 4, max = 128, message = "Password must be between 4 and 128 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub theme: OptionField<String>,
    pub color_theme: OptionField<String>,
    pub background_theme: OptionField<String>,
    pub password_hash: Option<String>,
}

impl ClientChanges {
    pub fn apply_to(self, client: &mut Client, now: DateTime<Utc>) {
        client.theme = self.theme.apply_to(client.theme.take());
        client.color_theme = self.color_theme.apply_to(client.color_theme.take());
        client.background_theme = self.background_theme.apply_to(client.background_theme.take());
        if let Some(hash) = self.password_hash {
            client.password_hash = Some(hash);
        }
        client.updated_at = now;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            slug: "sari-budi".into(),
            theme: None,
            color_theme: Some("sage_garden".into()),
            background_theme: Some("floral".into()),
            password_hash: Some("$argon2id$hash".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_value(client()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["colorTheme"], "sage_garden");
    }

    #[test]
    fn changes_keep_untouched_fields() {
        let mut c = client();
        ClientChanges {
            theme: OptionField::SetToValue("my-unified".into()),
            background_theme: OptionField::SetToNull,
            ..Default::default()
        }
        .apply_to(&mut c, Utc::now());

        assert_eq!(c.theme.as_deref(), Some("my-unified"));
        assert_eq!(c.color_theme.as_deref(), Some("sage_garden"));
        assert_eq!(c.background_theme, None);
        assert!(c.references_theme(ThemeSlot::Color, "sage_garden"));
        assert!(!c.references_theme(ThemeSlot::Background, "sage_garden"));
        assert!(c.references_theme(ThemeSlot::Unified, "my-unified"));
        assert!(!c.references_theme(ThemeSlot::Color, "floral"));
    }
}
