//! Shared handlers for the ornament library, bank logos and music library.
//! Each route registers its [`AssetKind`] as resource data.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        asset::{AssetKind, NewAssetRequest, UpdateAssetRequest},
        response::ApiSuccess,
    },
    errors::AppError,
    use_cases::extractors::ConfirmDelete,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct AssetQuery {
    pub id: Option<Uuid>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAssetQuery {
    pub id: Uuid,
}

#[instrument(skip(state))]
pub async fn get_assets(
    state: web::Data<AppState>,
    kind: web::Data<AssetKind>,
    query: web::Query<AssetQuery>,
) -> Result<impl Responder, AppError> {
    let handler = state.assets(**kind);
    let query = query.into_inner();

    match query.id {
        Some(id) => {
            let asset = handler.get_asset(id).await?;
            Ok(ApiSuccess::ok(json!({ "asset": asset })))
        }
        None => {
            let assets = handler.list_assets(query.category).await?;
            Ok(ApiSuccess::ok(json!({ "assets": assets })))
        }
    }
}

#[instrument(skip(state, data))]
pub async fn create_asset(
    state: web::Data<AppState>,
    kind: web::Data<AssetKind>,
    data: web::Json<NewAssetRequest>,
) -> Result<impl Responder, AppError> {
    let asset = state.assets(**kind).create_asset(data.into_inner()).await?;
    Ok(ApiSuccess::created(json!({ "asset": asset })))
}

#[instrument(skip(state, data))]
pub async fn update_asset(
    state: web::Data<AppState>,
    kind: web::Data<AssetKind>,
    data: web::Json<UpdateAssetRequest>,
) -> Result<impl Responder, AppError> {
    let asset = state.assets(**kind).update_asset(data.into_inner()).await?;
    Ok(ApiSuccess::ok(json!({ "asset": asset })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_asset(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    kind: web::Data<AssetKind>,
    query: web::Query<DeleteAssetQuery>,
) -> Result<HttpResponse, AppError> {
    state.assets(**kind).delete_asset(query.id).await?;
    Ok(ApiSuccess::ok(json!({ "message": format!("{} deleted", **kind) })))
}
