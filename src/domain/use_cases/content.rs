use std::sync::Arc;

use tracing::debug;
use validator::Validate;

use crate::{
    entities::content::{ContentData, ContentRecord, ContentType, ContentWriteRequest},
    errors::AppError,
    repositories::{client::ClientRepository, content::ContentRepository},
};

/// Per-client content blobs, validated against their typed schema on write.
pub struct ContentHandler {
    content: Arc<dyn ContentRepository>,
    clients: Arc<dyn ClientRepository>,
}

impl ContentHandler {
    pub fn new(content: Arc<dyn ContentRepository>, clients: Arc<dyn ClientRepository>) -> Self {
        ContentHandler { content, clients }
    }

    pub async fn get_content(&self, client_slug: &str, content_type: ContentType) -> Result<ContentRecord, AppError> {
        self.find_content(client_slug, content_type)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {} content for '{}'", content_type, client_slug)))
    }

    pub async fn find_content(&self, client_slug: &str, content_type: ContentType) -> Result<Option<ContentRecord>, AppError> {
        self.content.get_content(client_slug, content_type).await
    }

    pub async fn list_content(&self, client_slug: &str) -> Result<Vec<ContentRecord>, AppError> {
        self.content.list_content(client_slug).await
    }

    /// Replaces the whole blob (last write wins).
    pub async fn replace_content(&self, request: ContentWriteRequest) -> Result<ContentRecord, AppError> {
        self.check_write(&request).await?;
        debug!(slug = %request.client_slug, content_type = %request.content_type, "replacing content");
        self.content
            .replace_content(&request.client_slug, request.content_type, &request.content_data)
            .await
    }

    /// Overwrites only the top-level keys present in the request, atomically.
    pub async fn merge_content(&self, request: ContentWriteRequest) -> Result<ContentRecord, AppError> {
        self.check_write(&request).await?;
        debug!(slug = %request.client_slug, content_type = %request.content_type, "merging content");
        self.content
            .merge_content(&request.client_slug, request.content_type, &request.content_data)
            .await
    }

    /// Deletes one blob, or every blob of the client when `content_type` is `None`.
    pub async fn delete_content(&self, client_slug: &str, content_type: Option<ContentType>) -> Result<u64, AppError> {
        let deleted = self.content.delete_content(client_slug, content_type).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Content not found".into()));
        }
        Ok(deleted)
    }

    async fn check_write(&self, request: &ContentWriteRequest) -> Result<(), AppError> {
        request.validate()?;
        ContentData::parse(request.content_type, &request.content_data)?;
        if !self.clients.client_slug_exists(&request.client_slug).await? {
            return Err(AppError::NotFound("Client not found".into()));
        }
        Ok(())
    }
}
