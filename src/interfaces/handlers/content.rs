use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::{
        content::{ContentType, ContentWriteRequest},
        response::ApiSuccess,
    },
    errors::AppError,
    use_cases::extractors::ConfirmDelete,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuery {
    pub client_slug: String,
    pub content_type: Option<ContentType>,
}

#[instrument(skip(state))]
pub async fn get_client_content(
    state: web::Data<AppState>,
    query: web::Query<ContentQuery>,
) -> Result<impl Responder, AppError> {
    match query.content_type {
        Some(content_type) => {
            let record = state.content.get_content(&query.client_slug, content_type).await?;
            Ok(ApiSuccess::ok(json!({ "content": record })))
        }
        None => {
            let records = state.content.list_content(&query.client_slug).await?;
            Ok(ApiSuccess::ok(json!({ "content": records })))
        }
    }
}

/// Replaces the whole blob.
#[instrument(skip(state, data))]
pub async fn replace_client_content(
    state: web::Data<AppState>,
    data: web::Json<ContentWriteRequest>,
) -> Result<impl Responder, AppError> {
    let record = state.content.replace_content(data.into_inner()).await?;
    Ok(ApiSuccess::ok(json!({ "content": record })))
}

/// Merges the given top-level keys into the stored blob.
#[instrument(skip(state, data))]
pub async fn patch_client_content(
    state: web::Data<AppState>,
    data: web::Json<ContentWriteRequest>,
) -> Result<impl Responder, AppError> {
    let record = state.content.merge_content(data.into_inner()).await?;
    Ok(ApiSuccess::ok(json!({ "content": record })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_client_content(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    query: web::Query<ContentQuery>,
) -> Result<HttpResponse, AppError> {
    let deleted = state.content.delete_content(&query.client_slug, query.content_type).await?;
    Ok(ApiSuccess::ok(json!({ "deleted": deleted })))
}
