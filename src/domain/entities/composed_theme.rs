use serde::Serialize;

use crate::{
    constants::{FONT_BODY, FONT_HEADING, FONT_SCRIPT},
    entities::{
        background_theme::{SectionBackgrounds, ThemeImages},
        color_theme::{CustomStyles, ThemeColors},
    },
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Typography {
    pub heading: String,
    pub body: String,
    pub script: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            heading: FONT_HEADING.to_string(),
            body: FONT_BODY.to_string(),
            script: FONT_SCRIPT.to_string(),
        }
    }
}

/// Which halves of a composition had to fall back to `original`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FallbackReport {
    pub color: bool,
    pub background: bool,
}

impl FallbackReport {
    pub fn any(&self) -> bool {
        self.color || self.background
    }
}

/// One color theme merged with one background theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedTheme {
    pub color_theme_id: String,
    pub background_theme_id: String,
    pub name: String,
    pub colors: ThemeColors,
    pub custom_styles: CustomStyles,
    /// Set when the background half is a built-in image set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ThemeImages>,
    pub backgrounds: SectionBackgrounds,
    pub typography: Typography,
    pub fallback: FallbackReport,
}
