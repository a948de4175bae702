use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        catalog::{CatalogFilter, CatalogTemplate, NewCatalogTemplateRequest, UpdateCatalogTemplateRequest},
        response::Page,
    },
    errors::AppError,
    repositories::catalog::CatalogRepository,
    utils::image_data::{inspect_image_data, MAX_CATALOG_IMAGE_BYTES},
};

pub struct CatalogHandler {
    templates: Arc<dyn CatalogRepository>,
}

impl CatalogHandler {
    pub fn new(templates: Arc<dyn CatalogRepository>) -> Self {
        CatalogHandler { templates }
    }

    pub async fn list_templates(&self, filter: CatalogFilter) -> Result<Page<CatalogTemplate>, AppError> {
        let (templates, total) = self.templates.list_templates(&filter).await?;
        Ok(Page::new(templates, total, filter.page, filter.per_page))
    }

    pub async fn get_template(&self, id: Uuid) -> Result<CatalogTemplate, AppError> {
        self.templates
            .get_template(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Catalog template not found".into()))
    }

    pub async fn create_template(&self, request: NewCatalogTemplateRequest) -> Result<CatalogTemplate, AppError> {
        request.validate()?;
        inspect_image_data(&request.image_base64, MAX_CATALOG_IMAGE_BYTES)?;

        self.templates.create_template(&request.into_template(Utc::now())).await
    }

    pub async fn update_template(&self, request: UpdateCatalogTemplateRequest) -> Result<CatalogTemplate, AppError> {
        request.validate()?;
        if !request.badge_is_valid() {
            return Err(AppError::InvalidInput("Badge must be 1 to 30 characters".into()));
        }
        if let Some(image) = &request.image_base64 {
            inspect_image_data(image, MAX_CATALOG_IMAGE_BYTES)?;
        }

        let mut template = self.get_template(request.id).await?;
        request.apply_to(&mut template, Utc::now());
        self.templates.update_template(&template).await
    }

    pub async fn delete_template(&self, id: Uuid) -> Result<(), AppError> {
        if !self.templates.delete_template(id).await? {
            return Err(AppError::NotFound("Catalog template not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repositories::catalog::MockCatalogRepository, utils::image_data::MB};
    use base64::{engine::general_purpose::STANDARD, Engine};

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png_of(size: usize) -> String {
        let mut bytes = vec![0u8; size];
        bytes[..8].copy_from_slice(&PNG_MAGIC);
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    fn request(image: String) -> NewCatalogTemplateRequest {
        NewCatalogTemplateRequest {
            title: "Javanese Classic".into(),
            description: String::new(),
            category: " Premium ".into(),
            price: 250_000,
            url: "https://demo.example.com/javanese".into(),
            badge: Some("Best Seller".into()),
            image_base64: image,
        }
    }

    #[tokio::test]
    async fn image_over_five_megabytes_is_rejected_before_storage() {
        let mut templates = MockCatalogRepository::new();
        templates.expect_create_template().never();
        let handler = CatalogHandler::new(Arc::new(templates));

        let err = handler.create_template(request(png_of(5 * MB + 1))).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn category_is_normalised_on_create() {
        let mut templates = MockCatalogRepository::new();
        templates.expect_create_template().returning(|t| Ok(t.clone()));
        let handler = CatalogHandler::new(Arc::new(templates));

        let created = handler.create_template(request(png_of(64))).await.unwrap();
        assert_eq!(created.category, "premium");
    }

    #[tokio::test]
    async fn blank_badge_update_is_rejected() {
        let handler = CatalogHandler::new(Arc::new(MockCatalogRepository::new()));
        let update: UpdateCatalogTemplateRequest =
            serde_json::from_value(serde_json::json!({ "id": Uuid::new_v4(), "badge": "   " })).unwrap();

        assert!(matches!(handler.update_template(update).await, Err(AppError::InvalidInput(_))));
    }
}
