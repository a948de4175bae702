use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::{
    entities::{
        background_theme::inspect_backgrounds,
        client::ThemeSlot,
        ornament::{Ornament, OrnamentInput},
        unified_theme::{NewUnifiedThemeRequest, UnifiedTheme, UpdateUnifiedThemeRequest},
    },
    errors::AppError,
    registry,
    repositories::{client::ClientRepository, unified_theme::UnifiedThemeRepository},
    use_cases::custom_themes::{ensure_unreferenced, BUILTIN_READ_ONLY, THEME_EXISTS},
    utils::image_data::{inspect_image_reference, MAX_ORNAMENT_IMAGE_BYTES},
};

fn check_ornament(input: &OrnamentInput) -> Result<(), AppError> {
    input.validate()?;
    inspect_image_reference(&input.image, MAX_ORNAMENT_IMAGE_BYTES)?;
    Ok(())
}

const ORNAMENT_EXISTS: &str = "Ornament ID already exists";

/// Explicit ornament ids must be unique within one theme.
fn ensure_distinct_ornament_ids(inputs: &[OrnamentInput]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    if inputs.iter().filter_map(|o| o.id.as_deref()).all(|id| seen.insert(id)) {
        Ok(())
    } else {
        Err(AppError::Conflict(ORNAMENT_EXISTS.into()))
    }
}

/// Built-in unified themes plus editable custom ones and their ornaments.
pub struct UnifiedThemeHandler {
    themes: Arc<dyn UnifiedThemeRepository>,
    clients: Arc<dyn ClientRepository>,
}

impl UnifiedThemeHandler {
    pub fn new(themes: Arc<dyn UnifiedThemeRepository>, clients: Arc<dyn ClientRepository>) -> Self {
        UnifiedThemeHandler { themes, clients }
    }

    /// Built-ins first, then custom themes newest first.
    pub async fn list_themes(&self, include_ornaments: bool) -> Result<Vec<UnifiedTheme>, AppError> {
        let mut themes = registry::builtin_unified_themes();
        themes.extend(self.themes.list_unified_themes().await?);

        if !include_ornaments {
            themes = themes.into_iter().map(UnifiedTheme::without_ornaments).collect();
        }
        Ok(themes)
    }

    pub async fn get_theme(&self, id: &str, include_ornaments: bool) -> Result<UnifiedTheme, AppError> {
        let theme = self.find_theme(id).await?.ok_or_else(|| AppError::NotFound("Unified theme not found".into()))?;
        Ok(if include_ornaments { theme } else { theme.without_ornaments() })
    }

    /// Built-in or custom lookup; `None` when neither knows the id.
    pub async fn find_theme(&self, id: &str) -> Result<Option<UnifiedTheme>, AppError> {
        match registry::builtin_unified_theme(id) {
            Some(theme) => Ok(Some(theme)),
            None => self.themes.get_unified_theme(id).await,
        }
    }

    async fn custom_theme(&self, id: &str) -> Result<UnifiedTheme, AppError> {
        if registry::builtin_unified_theme(id).is_some() {
            return Err(AppError::InvalidInput(BUILTIN_READ_ONLY.into()));
        }
        self.themes
            .get_unified_theme(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unified theme not found".into()))
    }

    pub async fn create_theme(&self, request: NewUnifiedThemeRequest) -> Result<UnifiedTheme, AppError> {
        request.validate()?;
        if registry::is_builtin_id(&request.id) {
            return Err(AppError::Conflict(THEME_EXISTS.into()));
        }
        inspect_backgrounds(&request.backgrounds)?;
        ensure_distinct_ornament_ids(&request.ornaments)?;
        for ornament in &request.ornaments {
            inspect_image_reference(&ornament.image, MAX_ORNAMENT_IMAGE_BYTES)?;
        }

        let theme = self.themes.create_unified_theme(&request.into_theme(Utc::now())).await?;
        info!(id = %theme.id, ornaments = theme.ornaments.len(), "unified theme created");
        Ok(theme)
    }

    pub async fn update_theme(&self, request: UpdateUnifiedThemeRequest) -> Result<UnifiedTheme, AppError> {
        request.validate()?;
        if let Some(backgrounds) = &request.backgrounds {
            inspect_backgrounds(backgrounds)?;
        }
        if let Some(ornaments) = &request.ornaments {
            ensure_distinct_ornament_ids(ornaments)?;
        }
        for ornament in request.ornaments.iter().flatten() {
            inspect_image_reference(&ornament.image, MAX_ORNAMENT_IMAGE_BYTES)?;
        }

        let mut theme = self.custom_theme(&request.id).await?;
        request.apply_to(&mut theme, Utc::now());
        self.themes.update_unified_theme(&theme).await
    }

    pub async fn delete_theme(&self, id: &str) -> Result<(), AppError> {
        if registry::is_builtin_id(id) {
            return Err(AppError::InvalidInput(BUILTIN_READ_ONLY.into()));
        }
        ensure_unreferenced(self.clients.as_ref(), ThemeSlot::Unified, id).await?;

        if !self.themes.delete_unified_theme(id).await? {
            return Err(AppError::NotFound("Unified theme not found".into()));
        }
        Ok(())
    }

    pub async fn add_ornament(&self, theme_id: &str, input: OrnamentInput) -> Result<Ornament, AppError> {
        check_ornament(&input)?;
        let mut theme = self.custom_theme(theme_id).await?;
        if let Some(id) = &input.id {
            if theme.ornaments.iter().any(|o| &o.id == id) {
                return Err(AppError::Conflict(ORNAMENT_EXISTS.into()));
            }
        }

        let now = Utc::now();
        let ornament = input.into_ornament(now);
        theme.ornaments.push(ornament.clone());
        theme.updated_at = Some(now);
        self.themes.update_unified_theme(&theme).await?;

        info!(theme_id, ornament_id = %ornament.id, section = %ornament.section, "ornament added");
        Ok(ornament)
    }

    pub async fn update_ornament(&self, theme_id: &str, ornament_id: &str, input: OrnamentInput) -> Result<Ornament, AppError> {
        check_ornament(&input)?;
        let mut theme = self.custom_theme(theme_id).await?;

        let slot = theme
            .ornaments
            .iter_mut()
            .find(|o| o.id == ornament_id)
            .ok_or_else(|| AppError::NotFound("Ornament not found".into()))?;
        let ornament = input.replace(slot);
        *slot = ornament.clone();

        theme.updated_at = Some(Utc::now());
        self.themes.update_unified_theme(&theme).await?;
        Ok(ornament)
    }

    pub async fn remove_ornament(&self, theme_id: &str, ornament_id: &str) -> Result<(), AppError> {
        let mut theme = self.custom_theme(theme_id).await?;

        let before = theme.ornaments.len();
        theme.ornaments.retain(|o| o.id != ornament_id);
        if theme.ornaments.len() == before {
            return Err(AppError::NotFound("Ornament not found".into()));
        }

        theme.updated_at = Some(Utc::now());
        self.themes.update_unified_theme(&theme).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{color_theme::{sample_colors, CustomStyles}, ornament::sample_input, section::Section},
        repositories::{client::MockClientRepository, unified_theme::MockUnifiedThemeRepository},
    };

    fn stored(id: &str, ornaments: Vec<Ornament>) -> UnifiedTheme {
        let now = Utc::now();
        UnifiedTheme {
            id: id.into(),
            name: "Batik Gold".into(),
            description: String::new(),
            colors: sample_colors(),
            custom_styles: CustomStyles::default(),
            backgrounds: Default::default(),
            images: None,
            ornaments,
            is_builtin: false,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    fn handler(themes: MockUnifiedThemeRepository) -> UnifiedThemeHandler {
        UnifiedThemeHandler::new(Arc::new(themes), Arc::new(MockClientRepository::new()))
    }

    #[tokio::test]
    async fn list_starts_with_builtins_and_strips_ornaments_by_default() {
        let ornament = sample_input(Section::Hero, 12).into_ornament(Utc::now());
        let mut themes = MockUnifiedThemeRepository::new();
        themes
            .expect_list_unified_themes()
            .returning(move || Ok(vec![stored("batik", vec![ornament.clone()])]));
        let handler = handler(themes);

        let listed = handler.list_themes(false).await.unwrap();
        assert!(listed[0].is_builtin);
        assert_eq!(listed.last().unwrap().id, "batik");
        assert!(listed.iter().all(|t| t.ornaments.is_empty()));

        let with_ornaments = handler.list_themes(true).await.unwrap();
        assert_eq!(with_ornaments.last().unwrap().ornaments.len(), 1);
    }

    #[tokio::test]
    async fn ornaments_cannot_be_added_to_builtins() {
        let mut themes = MockUnifiedThemeRepository::new();
        themes.expect_update_unified_theme().never();
        let handler = handler(themes);

        let err = handler.add_ornament("sage_garden", sample_input(Section::Hero, 5)).await.unwrap_err();
        assert_eq!(err.to_string(), BUILTIN_READ_ONLY);
    }

    #[tokio::test]
    async fn update_keeps_ornament_identity() {
        let existing = sample_input(Section::Gallery, 5).into_ornament(Utc::now());
        let existing_id = existing.id.clone();
        let mut themes = MockUnifiedThemeRepository::new();
        themes
            .expect_get_unified_theme()
            .returning(move |id| Ok(Some(stored(id, vec![existing.clone()]))));
        themes.expect_update_unified_theme().returning(|t| Ok(t.clone()));
        let handler = handler(themes);

        let mut input = sample_input(Section::Gallery, 18);
        input.id = Some("ignored".into());
        let updated = handler.update_ornament("batik", &existing_id, input).await.unwrap();

        assert_eq!(updated.id, existing_id);
        assert_eq!(updated.style.z_index, 18);
    }

    #[tokio::test]
    async fn out_of_range_scale_is_rejected() {
        let handler = handler(MockUnifiedThemeRepository::new());
        let mut input = sample_input(Section::Hero, 10);
        input.transform.scale = 4.0;

        let err = handler.add_ornament("batik", input).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn removing_unknown_ornament_is_not_found() {
        let mut themes = MockUnifiedThemeRepository::new();
        themes.expect_get_unified_theme().returning(|id| Ok(Some(stored(id, Vec::new()))));
        let handler = handler(themes);

        let err = handler.remove_ornament("batik", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    fn with_id(section: Section, id: &str) -> OrnamentInput {
        let mut input = sample_input(section, 5);
        input.id = Some(id.into());
        input
    }

    #[tokio::test]
    async fn create_refuses_repeated_ornament_ids() {
        let mut themes = MockUnifiedThemeRepository::new();
        themes.expect_create_unified_theme().never();
        let handler = handler(themes);

        let request = NewUnifiedThemeRequest {
            id: "batik".into(),
            name: "Batik Gold".into(),
            description: String::new(),
            colors: sample_colors(),
            custom_styles: CustomStyles::default(),
            backgrounds: Default::default(),
            ornaments: vec![with_id(Section::Hero, "leaf"), with_id(Section::Gallery, "leaf")],
        };

        let err = handler.create_theme(request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), ORNAMENT_EXISTS);
    }

    #[tokio::test]
    async fn replacing_the_ornament_list_refuses_repeated_ids() {
        let mut themes = MockUnifiedThemeRepository::new();
        themes.expect_update_unified_theme().never();
        let handler = handler(themes);

        let request = UpdateUnifiedThemeRequest {
            id: "batik".into(),
            name: None,
            description: None,
            colors: None,
            custom_styles: None,
            backgrounds: None,
            ornaments: Some(vec![with_id(Section::Hero, "leaf"), with_id(Section::Hero, "leaf")]),
        };

        let err = handler.update_theme(request).await.unwrap_err();
        assert_eq!(err.to_string(), ORNAMENT_EXISTS);
    }

    #[test]
    fn ornaments_without_ids_never_collide() {
        let inputs = vec![sample_input(Section::Hero, 1), sample_input(Section::Hero, 2)];
        assert!(ensure_distinct_ornament_ids(&inputs).is_ok());
    }
}
