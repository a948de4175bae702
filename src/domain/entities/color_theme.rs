use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use crate::entities::{
    background_theme::SectionBackgrounds,
    option_fields::OptionField,
    validation::{validate_css_color, validate_identifier},
};

// ───── Palette ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ThemeColors {
    #[validate(custom(function = "validate_css_color"))]
    pub primary: String,
    #[validate(custom(function = "validate_css_color"))]
    pub primarylight: String,
    #[validate(custom(function = "validate_css_color"))]
    pub darkprimary: String,
    #[validate(custom(function = "validate_css_color"))]
    pub textprimary: String,
    #[validate(custom(function = "validate_css_color"))]
    pub gold: String,
    #[validate(custom(function = "validate_css_color"))]
    pub lightblue: String,
    #[validate(custom(function = "validate_css_color"))]
    pub secondary: String,
    #[validate(custom(function = "validate_css_color"))]
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomStyles {
    #[validate(length(max = 64))]
    pub border_radius: String,
    #[validate(length(max = 256))]
    pub box_shadow: String,
    #[validate(length(max = 512))]
    pub gradient: String,
}

impl Default for CustomStyles {
    fn default() -> Self {
        Self {
            border_radius: "1rem".into(),
            box_shadow: "0 10px 30px rgba(0, 0, 0, 0.1)".into(),
            gradient: "linear-gradient(135deg, #f5f0e8 0%, #ffffff 100%)".into(),
        }
    }
}

/// A color theme as seen by the composer, built-in or custom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
    pub custom_styles: CustomStyles,
}

// ───── Custom themes (stored) ───────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct CustomThemeRow {
    pub theme_id: String,
    pub theme_name: String,
    pub description: String,
    pub colors: Json<ThemeColors>,
    pub custom_styles: Json<CustomStyles>,
    pub backgrounds: Option<Json<SectionBackgrounds>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTheme {
    pub theme_id: String,
    pub theme_name: String,
    pub description: String,
    pub colors: ThemeColors,
    pub custom_styles: CustomStyles,
    /// Only loaded when explicitly requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backgrounds: Option<SectionBackgrounds>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomThemeRow> for CustomTheme {
    fn from(row: CustomThemeRow) -> Self {
        CustomTheme {
            theme_id: row.theme_id,
            theme_name: row.theme_name,
            description: row.description,
            colors: row.colors.0,
            custom_styles: row.custom_styles.0,
            backgrounds: row.backgrounds.map(|b| b.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&CustomTheme> for ColorTheme {
    fn from(theme: &CustomTheme) -> Self {
        ColorTheme {
            id: theme.theme_id.clone(),
            name: theme.theme_name.clone(),
            description: theme.description.clone(),
            colors: theme.colors.clone(),
            custom_styles: theme.custom_styles.clone(),
        }
    }
}

// ───── Requests ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomThemeRequest {
    #[validate(
        length(min = 1, max = 64, message = "Theme ID is required"),
        custom(function = "validate_identifier")
    )]
    pub theme_id: String,

    #[validate(length(min = 1, max = 100, message = "Theme name is required"))]
    pub theme_name: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,

    #[validate(nested)]
    pub colors: ThemeColors,

    #[serde(default)]
    #[validate(nested)]
    pub custom_styles: CustomStyles,

    #[serde(default)]
    pub backgrounds: Option<SectionBackgrounds>,
}

impl NewCustomThemeRequest {
    pub fn into_theme(self, now: DateTime<Utc>) -> CustomTheme {
        CustomTheme {
            theme_id: self.theme_id,
            theme_name: self.theme_name.trim().to_string(),
            description: self.description,
            colors: self.colors,
            custom_styles: self.custom_styles,
            backgrounds: self.backgrounds,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomThemeRequest {
    #[validate(length(min = 1, max = 64, message = "Theme ID is required"))]
    pub theme_id: String,

    #[validate(length(min = 1, max = 100, message = "Theme name cannot be empty"))]
    pub theme_name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(nested)]
    pub colors: Option<ThemeColors>,

    #[validate(nested)]
    pub custom_styles: Option<CustomStyles>,

    #[serde(default)]
    pub backgrounds: OptionField<SectionBackgrounds>,
}

impl UpdateCustomThemeRequest {
    pub fn apply_to(self, theme: &mut CustomTheme, now: DateTime<Utc>) {
        if let Some(name) = self.theme_name {
            theme.theme_name = name.trim().to_string();
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
        theme.backgrounds = self.backgrounds.apply_to(theme.backgrounds.take());
        theme.updated_at = now;
    }
}

#[cfg(test)]
pub(crate) fn sample_colors() -> ThemeColors {
    ThemeColors {
        primary: "#8B7355".into(),
        primarylight: "#D4C4B0".into(),
        darkprimary: "#5C4A3A".into(),
        textprimary: "#3E3E3E".into(),
        gold: "#C9A961".into(),
        lightblue: "#E8F4F8".into(),
        secondary: "#F5F0E8".into(),
        accent: "#B8860B".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_create_request_gets_default_styles() {
        let request: NewCustomThemeRequest = serde_json::from_value(json!({
            "themeId": "x",
            "themeName": "X",
            "colors": serde_json::to_value(sample_colors()).unwrap(),
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.custom_styles, CustomStyles::default());
        assert!(request.backgrounds.is_none());
    }

    #[test]
    fn bad_color_is_reported_with_nested_path() {
        let mut colors = sample_colors();
        colors.gold = "expression(alert(1))".into();
        let request = NewCustomThemeRequest {
            theme_id: "x".into(),
            theme_name: "X".into(),
            description: String::new(),
            colors,
            custom_styles: CustomStyles::default(),
            backgrounds: None,
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("colors"));
    }

    #[test]
    fn update_only_touches_sent_fields() {
        let now = Utc::now();
        let mut theme = NewCustomThemeRequest {
            theme_id: "x".into(),
            theme_name: "X".into(),
            description: "first".into(),
            colors: sample_colors(),
            custom_styles: CustomStyles::default(),
            backgrounds: None,
        }
        .into_theme(now);

        let update: UpdateCustomThemeRequest = serde_json::from_value(json!({
            "themeId": "x",
            "themeName": "  Renamed  "
        }))
        .unwrap();
        update.apply_to(&mut theme, now);

        assert_eq!(theme.theme_name, "Renamed");
        assert_eq!(theme.description, "first");
        assert_eq!(theme.colors, sample_colors());
    }
}
