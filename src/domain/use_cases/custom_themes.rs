use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

use crate::{
    cache::ttl_cache::TtlCache,
    entities::{
        background_theme::inspect_backgrounds,
        client::ThemeSlot,
        color_theme::{ColorTheme, CustomTheme, NewCustomThemeRequest, UpdateCustomThemeRequest},
        option_fields::OptionField,
    },
    errors::AppError,
    registry,
    repositories::{client::ClientRepository, custom_theme::CustomThemeRepository},
};

pub(crate) const BUILTIN_READ_ONLY: &str = "Built-in themes cannot be modified";
pub(crate) const THEME_EXISTS: &str = "Theme ID already exists";

/// Custom color themes, with the background-free list cached process-wide.
pub struct CustomThemeHandler {
    themes: Arc<dyn CustomThemeRepository>,
    clients: Arc<dyn ClientRepository>,
    cache: TtlCache<Vec<CustomTheme>>,
}

impl CustomThemeHandler {
    pub fn new(
        themes: Arc<dyn CustomThemeRepository>,
        clients: Arc<dyn ClientRepository>,
        cache: TtlCache<Vec<CustomTheme>>,
    ) -> Self {
        CustomThemeHandler { themes, clients, cache }
    }

    /// Lists custom themes. Background maps bypass the cache.
    pub async fn list_themes(&self, refresh: bool, include_backgrounds: bool) -> Result<Vec<CustomTheme>, AppError> {
        if include_backgrounds {
            return self.themes.list_custom_themes(true).await;
        }
        if !refresh {
            if let Some(themes) = self.cache.get() {
                debug!(count = themes.len(), "custom theme list served from cache");
                return Ok(themes);
            }
        }

        let themes = self.themes.list_custom_themes(false).await?;
        self.cache.put(themes.clone());
        Ok(themes)
    }

    pub async fn get_theme(&self, theme_id: &str, include_backgrounds: bool) -> Result<CustomTheme, AppError> {
        self.themes
            .get_custom_theme(theme_id, include_backgrounds)
            .await?
            .ok_or_else(|| AppError::NotFound("Theme not found".into()))
    }

    /// Color-theme lookup for the composer, served from the cached list.
    pub async fn find_color_theme(&self, theme_id: &str) -> Result<Option<ColorTheme>, AppError> {
        let themes = self.list_themes(false, false).await?;
        Ok(themes.iter().find(|t| t.theme_id == theme_id).map(ColorTheme::from))
    }

    pub async fn create_theme(&self, request: NewCustomThemeRequest) -> Result<CustomTheme, AppError> {
        request.validate()?;
        if registry::is_builtin_id(&request.theme_id) {
            return Err(AppError::Conflict(THEME_EXISTS.into()));
        }
        if let Some(backgrounds) = &request.backgrounds {
            inspect_backgrounds(backgrounds)?;
        }

        let theme = self.themes.create_custom_theme(&request.into_theme(Utc::now())).await?;
        self.cache.invalidate();
        info!(theme_id = %theme.theme_id, "custom theme created");
        Ok(theme)
    }

    pub async fn update_theme(&self, request: UpdateCustomThemeRequest) -> Result<CustomTheme, AppError> {
        request.validate()?;
        if registry::is_builtin_id(&request.theme_id) {
            return Err(AppError::InvalidInput(BUILTIN_READ_ONLY.into()));
        }
        if let OptionField::SetToValue(backgrounds) = &request.backgrounds {
            inspect_backgrounds(backgrounds)?;
        }

        let mut theme = self.get_theme(&request.theme_id, true).await?;
        request.apply_to(&mut theme, Utc::now());

        let theme = self.themes.update_custom_theme(&theme).await?;
        self.cache.invalidate();
        Ok(theme)
    }

    /// Refuses to delete a theme any client still points at.
    pub async fn delete_theme(&self, theme_id: &str) -> Result<(), AppError> {
        if registry::is_builtin_id(theme_id) {
            return Err(AppError::InvalidInput(BUILTIN_READ_ONLY.into()));
        }
        ensure_unreferenced(self.clients.as_ref(), ThemeSlot::Color, theme_id).await?;

        if !self.themes.delete_custom_theme(theme_id).await? {
            return Err(AppError::NotFound("Theme not found".into()));
        }
        self.cache.invalidate();
        info!(theme_id, "custom theme deleted");
        Ok(())
    }
}

pub(crate) async fn ensure_unreferenced(
    clients: &dyn ClientRepository,
    slot: ThemeSlot,
    theme_id: &str,
) -> Result<(), AppError> {
    match clients.count_theme_references(slot, theme_id).await? {
        0 => Ok(()),
        n => Err(AppError::Conflict(format!("Theme is in use by {} client(s)", n))),
    }
}
