use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::{
    entities::{
        background_theme::{
            inspect_backgrounds, CustomBackgroundTheme, NewBackgroundThemeRequest, UpdateBackgroundThemeRequest,
        },
        client::ThemeSlot,
        section::Section,
    },
    errors::AppError,
    registry,
    repositories::{background_theme::BackgroundThemeRepository, client::ClientRepository},
    use_cases::custom_themes::{ensure_unreferenced, BUILTIN_READ_ONLY, THEME_EXISTS},
    utils::image_data::{inspect_image_reference, MAX_BACKGROUND_IMAGE_BYTES},
};

pub struct BackgroundThemeHandler {
    themes: Arc<dyn BackgroundThemeRepository>,
    clients: Arc<dyn ClientRepository>,
}

impl BackgroundThemeHandler {
    pub fn new(themes: Arc<dyn BackgroundThemeRepository>, clients: Arc<dyn ClientRepository>) -> Self {
        BackgroundThemeHandler { themes, clients }
    }

    pub async fn list_themes(&self) -> Result<Vec<CustomBackgroundTheme>, AppError> {
        self.themes.list_background_themes().await
    }

    pub async fn get_theme(&self, id: &str) -> Result<CustomBackgroundTheme, AppError> {
        self.themes
            .get_background_theme(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Background theme not found".into()))
    }

    pub async fn create_theme(&self, request: NewBackgroundThemeRequest) -> Result<CustomBackgroundTheme, AppError> {
        request.validate()?;
        if registry::is_builtin_id(&request.id) {
            return Err(AppError::Conflict(THEME_EXISTS.into()));
        }
        inspect_backgrounds(&request.backgrounds)?;

        let theme = self.themes.create_background_theme(&request.into_theme(Utc::now())).await?;
        info!(id = %theme.id, sections = theme.backgrounds.len(), "background theme created");
        Ok(theme)
    }

    pub async fn update_theme(&self, request: UpdateBackgroundThemeRequest) -> Result<CustomBackgroundTheme, AppError> {
        request.validate()?;
        if registry::is_builtin_id(&request.id) {
            return Err(AppError::InvalidInput(BUILTIN_READ_ONLY.into()));
        }
        if let Some(backgrounds) = &request.backgrounds {
            inspect_backgrounds(backgrounds)?;
        }

        let mut theme = self.get_theme(&request.id).await?;
        request.apply_to(&mut theme, Utc::now());
        self.themes.update_background_theme(&theme).await
    }

    /// Sets or replaces the image of a single section.
    pub async fn set_section_background(
        &self,
        id: &str,
        section: Section,
        image: String,
    ) -> Result<CustomBackgroundTheme, AppError> {
        if registry::is_builtin_id(id) {
            return Err(AppError::InvalidInput(BUILTIN_READ_ONLY.into()));
        }
        inspect_image_reference(&image, MAX_BACKGROUND_IMAGE_BYTES)?;

        let mut theme = self.get_theme(id).await?;
        theme.backgrounds.insert(section, image);
        theme.updated_at = Utc::now();
        let theme = self.themes.update_background_theme(&theme).await?;
        info!(id, %section, "background section updated");
        Ok(theme)
    }

    pub async fn delete_theme(&self, id: &str) -> Result<(), AppError> {
        if registry::is_builtin_id(id) {
            return Err(AppError::InvalidInput(BUILTIN_READ_ONLY.into()));
        }
        ensure_unreferenced(self.clients.as_ref(), ThemeSlot::Background, id).await?;

        if !self.themes.delete_background_theme(id).await? {
            return Err(AppError::NotFound("Background theme not found".into()));
        }
        Ok(())
    }
}
