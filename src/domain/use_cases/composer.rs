use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::{
    constants::ORIGINAL_THEME_ID,
    entities::{
        background_theme::{BackgroundTheme, SectionBackgrounds, ThemeImages},
        client::Client,
        color_theme::ColorTheme,
        composed_theme::{ComposedTheme, FallbackReport, Typography},
        ornament::Ornament,
        unified_theme::UnifiedTheme,
    },
    registry,
    repositories::{background_theme::BackgroundThemeRepository, unified_theme::UnifiedThemeRepository},
    use_cases::custom_themes::CustomThemeHandler,
};

/// Background half of a composition.
struct BackgroundHalf {
    id: String,
    name: String,
    images: Option<ThemeImages>,
    backgrounds: SectionBackgrounds,
}

/// A client's composed theme plus the ornaments of its unified theme, if any.
#[derive(Debug, Clone, Serialize)]
pub struct ClientTheme {
    pub theme: ComposedTheme,
    pub ornaments: Vec<Ornament>,
}

/// Merges one color theme with one background theme.
///
/// Lookups never fail: an unknown id or a storage error on either half
/// substitutes the `original` built-in for that half and is reported in
/// [`ComposedTheme::fallback`].
pub struct ThemeComposer {
    color_themes: Arc<CustomThemeHandler>,
    background_themes: Arc<dyn BackgroundThemeRepository>,
    unified_themes: Arc<dyn UnifiedThemeRepository>,
}

impl ThemeComposer {
    pub fn new(
        color_themes: Arc<CustomThemeHandler>,
        background_themes: Arc<dyn BackgroundThemeRepository>,
        unified_themes: Arc<dyn UnifiedThemeRepository>,
    ) -> Self {
        ThemeComposer { color_themes, background_themes, unified_themes }
    }

    pub async fn compose(&self, color_theme_id: &str, background_theme_id: &str) -> ComposedTheme {
        let mut fallback = FallbackReport::default();

        let color = match self.resolve_color(color_theme_id).await {
            Some(color) => color,
            None => {
                warn!(color_theme_id, "color theme not found, falling back to original");
                fallback.color = true;
                registry::original_color_theme().clone()
            }
        };

        let background = match self.resolve_background(background_theme_id).await {
            Some(background) => background,
            None => {
                warn!(background_theme_id, "background theme not found, falling back to original");
                fallback.background = true;
                builtin_background(registry::original_background_theme())
            }
        };

        let name = if color.id == background.id {
            color.name.clone()
        } else {
            format!("{} / {}", color.name, background.name)
        };

        ComposedTheme {
            color_theme_id: color.id,
            background_theme_id: background.id,
            name,
            colors: color.colors,
            custom_styles: color.custom_styles,
            images: background.images,
            backgrounds: background.backgrounds,
            typography: Typography::default(),
            fallback,
        }
    }

    /// Resolution order: explicit color/background pair, then `theme` as a
    /// custom unified theme, then `theme` as a built-in id, then `original`.
    pub async fn compose_for_client(&self, client: &Client) -> ClientTheme {
        if client.color_theme.is_some() || client.background_theme.is_some() {
            let color = client.color_theme.as_deref().unwrap_or(ORIGINAL_THEME_ID);
            let background = client.background_theme.as_deref().unwrap_or(ORIGINAL_THEME_ID);
            return ClientTheme { theme: self.compose(color, background).await, ornaments: Vec::new() };
        }

        let Some(theme_id) = client.theme.as_deref() else {
            return ClientTheme {
                theme: self.compose(ORIGINAL_THEME_ID, ORIGINAL_THEME_ID).await,
                ornaments: Vec::new(),
            };
        };

        if let Some((color, background)) = registry::builtin_pair(theme_id) {
            return ClientTheme { theme: self.compose(color, background).await, ornaments: Vec::new() };
        }

        match self.unified_themes.get_unified_theme(theme_id).await {
            Ok(Some(unified)) => unified_composition(unified),
            Ok(None) => {
                warn!(slug = %client.slug, theme_id, "client theme not found, falling back to original");
                fallback_to_original(self.compose(ORIGINAL_THEME_ID, ORIGINAL_THEME_ID).await)
            }
            Err(e) => {
                warn!(slug = %client.slug, theme_id, error = %e, "unified theme lookup failed, falling back to original");
                fallback_to_original(self.compose(ORIGINAL_THEME_ID, ORIGINAL_THEME_ID).await)
            }
        }
    }

    async fn resolve_color(&self, id: &str) -> Option<ColorTheme> {
        if let Some(theme) = registry::color_theme(id) {
            return Some(theme.clone());
        }
        self.color_themes
            .find_color_theme(id)
            .await
            .map_err(|e| warn!(color_theme_id = id, error = %e, "custom color theme lookup failed"))
            .ok()
            .flatten()
    }

    async fn resolve_background(&self, id: &str) -> Option<BackgroundHalf> {
        if let Some(theme) = registry::background_theme(id) {
            return Some(builtin_background(theme));
        }
        self.background_themes
            .get_background_theme(id)
            .await
            .map_err(|e| warn!(background_theme_id = id, error = %e, "custom background theme lookup failed"))
            .ok()
            .flatten()
            .map(|theme| BackgroundHalf {
                id: theme.id,
                name: theme.name,
                images: None,
                backgrounds: theme.backgrounds,
            })
    }
}

fn builtin_background(theme: &BackgroundTheme) -> BackgroundHalf {
    BackgroundHalf {
        id: theme.id.clone(),
        name: theme.name.clone(),
        images: Some(theme.images.clone()),
        backgrounds: SectionBackgrounds::new(),
    }
}

fn fallback_to_original(mut theme: ComposedTheme) -> ClientTheme {
    theme.fallback = FallbackReport { color: true, background: true };
    ClientTheme { theme, ornaments: Vec::new() }
}

fn unified_composition(unified: UnifiedTheme) -> ClientTheme {
    let theme = ComposedTheme {
        color_theme_id: unified.id.clone(),
        background_theme_id: unified.id,
        name: unified.name,
        colors: unified.colors,
        custom_styles: unified.custom_styles,
        images: unified.images,
        backgrounds: unified.backgrounds,
        typography: Typography::default(),
        fallback: FallbackReport::default(),
    };
    ClientTheme { theme, ornaments: unified.ornaments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::ttl_cache::{SystemClock, TtlCache},
        entities::{
            background_theme::CustomBackgroundTheme,
            color_theme::{sample_colors, CustomStyles, CustomTheme},
            section::Section,
        },
        errors::AppError,
        repositories::{
            background_theme::MockBackgroundThemeRepository, client::MockClientRepository,
            custom_theme::MockCustomThemeRepository, unified_theme::MockUnifiedThemeRepository,
        },
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn composer(
        custom: MockCustomThemeRepository,
        backgrounds: MockBackgroundThemeRepository,
        unified: MockUnifiedThemeRepository,
    ) -> ThemeComposer {
        let handler = CustomThemeHandler::new(
            Arc::new(custom),
            Arc::new(MockClientRepository::new()),
            TtlCache::new(chrono::Duration::minutes(5), Arc::new(SystemClock)),
        );
        ThemeComposer::new(Arc::new(handler), Arc::new(backgrounds), Arc::new(unified))
    }

    fn empty_composer() -> ThemeComposer {
        let mut custom = MockCustomThemeRepository::new();
        custom.expect_list_custom_themes().returning(|_| Ok(Vec::new()));
        let mut backgrounds = MockBackgroundThemeRepository::new();
        backgrounds.expect_get_background_theme().returning(|_| Ok(None));
        let mut unified = MockUnifiedThemeRepository::new();
        unified.expect_get_unified_theme().returning(|_| Ok(None));
        composer(custom, backgrounds, unified)
    }

    fn client(theme: Option<&str>, color: Option<&str>, background: Option<&str>) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            slug: "sari-budi".into(),
            theme: theme.map(Into::into),
            color_theme: color.map(Into::into),
            background_theme: background.map(Into::into),
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn builtin_pairs_compose_without_fallback() {
        let composer = empty_composer();
        for color in registry::color_themes() {
            for background in registry::background_themes() {
                let composed = composer.compose(&color.id, &background.id).await;
                assert_eq!(composed.colors, color.colors);
                assert_eq!(composed.images.as_ref(), Some(&background.images));
                assert!(!composed.fallback.any());
            }
        }
    }

    #[tokio::test]
    async fn unknown_color_falls_back_to_original() {
        let composed = empty_composer().compose("does-not-exist", "floral").await;

        assert_eq!(composed.colors, registry::original_color_theme().colors);
        assert_eq!(composed.background_theme_id, "floral");
        assert!(composed.fallback.color);
        assert!(!composed.fallback.background);
    }

    #[tokio::test]
    async fn storage_errors_also_fall_back() {
        let mut custom = MockCustomThemeRepository::new();
        custom
            .expect_list_custom_themes()
            .returning(|_| Err(AppError::InternalError("connection reset".into())));
        let mut backgrounds = MockBackgroundThemeRepository::new();
        backgrounds
            .expect_get_background_theme()
            .returning(|_| Err(AppError::InternalError("connection reset".into())));
        let composer = composer(custom, backgrounds, MockUnifiedThemeRepository::new());

        let composed = composer.compose("lavender", "batik").await;
        assert_eq!(composed.color_theme_id, ORIGINAL_THEME_ID);
        assert_eq!(composed.background_theme_id, ORIGINAL_THEME_ID);
        assert!(composed.fallback.color && composed.fallback.background);
    }

    #[tokio::test]
    async fn custom_halves_are_resolved_from_storage() {
        let now = Utc::now();
        let mut custom = MockCustomThemeRepository::new();
        custom.expect_list_custom_themes().returning(move |_| {
            Ok(vec![CustomTheme {
                theme_id: "lavender".into(),
                theme_name: "Lavender".into(),
                description: String::new(),
                colors: sample_colors(),
                custom_styles: CustomStyles::default(),
                backgrounds: None,
                created_at: now,
                updated_at: now,
            }])
        });
        let mut backgrounds = MockBackgroundThemeRepository::new();
        backgrounds.expect_get_background_theme().returning(move |id| {
            let mut theme = CustomBackgroundTheme {
                id: id.into(),
                name: "Batik".into(),
                description: String::new(),
                backgrounds: SectionBackgrounds::new(),
                created_at: now,
                updated_at: now,
            };
            theme.backgrounds.insert(Section::Hero, "/uploads/batik-hero.jpg".into());
            Ok(Some(theme))
        });
        let composer = composer(custom, backgrounds, MockUnifiedThemeRepository::new());

        let composed = composer.compose("lavender", "batik").await;
        assert_eq!(composed.colors, sample_colors());
        assert!(composed.images.is_none());
        assert_eq!(composed.backgrounds.get(&Section::Hero).map(String::as_str), Some("/uploads/batik-hero.jpg"));
        assert_eq!(composed.name, "Lavender / Batik");
    }

    #[tokio::test]
    async fn explicit_pair_wins_over_theme() {
        let composer = empty_composer();
        let resolved = composer
            .compose_for_client(&client(Some("terracotta"), Some("navy_gold"), None))
            .await;

        assert_eq!(resolved.theme.color_theme_id, "navy_gold");
        assert_eq!(resolved.theme.background_theme_id, ORIGINAL_THEME_ID);
    }

    #[tokio::test]
    async fn builtin_theme_id_resolves_both_halves() {
        let resolved = empty_composer().compose_for_client(&client(Some("terracotta"), None, None)).await;

        assert_eq!(resolved.theme.color_theme_id, "terracotta");
        assert_eq!(resolved.theme.background_theme_id, "rustic");
    }

    #[tokio::test]
    async fn unknown_client_theme_uses_original() {
        let resolved = empty_composer().compose_for_client(&client(Some("gone"), None, None)).await;

        assert_eq!(resolved.theme.color_theme_id, ORIGINAL_THEME_ID);
        assert!(resolved.theme.fallback.any());
    }
}
