use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::asset::{check_metadata, AssetKind, LibraryAsset, NewAssetRequest, UpdateAssetRequest},
    errors::AppError,
    repositories::asset::AssetRepository,
};

/// CRUD over one asset library; the repository decides which.
pub struct AssetHandler {
    assets: Arc<dyn AssetRepository>,
}

impl AssetHandler {
    pub fn new(assets: Arc<dyn AssetRepository>) -> Self {
        AssetHandler { assets }
    }

    pub fn kind(&self) -> AssetKind {
        self.assets.kind()
    }

    pub async fn list_assets(&self, category: Option<String>) -> Result<Vec<LibraryAsset>, AppError> {
        let category = category.map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty());
        self.assets.list_assets(category).await
    }

    pub async fn get_asset(&self, id: Uuid) -> Result<LibraryAsset, AppError> {
        self.assets
            .get_asset(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {} with id {}", self.kind(), id)))
    }

    pub async fn create_asset(&self, request: NewAssetRequest) -> Result<LibraryAsset, AppError> {
        request.validate()?;
        self.kind().check_data(&request.data)?;
        check_metadata(request.metadata.as_ref())?;

        self.assets.create_asset(&request.into_asset(Utc::now())).await
    }

    pub async fn update_asset(&self, request: UpdateAssetRequest) -> Result<LibraryAsset, AppError> {
        request.validate()?;
        if let Some(data) = &request.data {
            self.kind().check_data(data)?;
        }
        check_metadata(request.metadata.as_ref())?;

        let mut asset = self.get_asset(request.id).await?;
        request.apply_to(&mut asset, Utc::now());
        self.assets.update_asset(&asset).await
    }

    pub async fn delete_asset(&self, id: Uuid) -> Result<(), AppError> {
        if !self.assets.delete_asset(id).await? {
            return Err(AppError::NotFound(format!("No {} with id {}", self.kind(), id)));
        }
        Ok(())
    }
}
