use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        catalog::{CatalogFilter, NewCatalogTemplateRequest, UpdateCatalogTemplateRequest},
        response::{page_bounds, ApiSuccess},
    },
    errors::AppError,
    use_cases::extractors::ConfirmDelete,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub id: Option<Uuid>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCatalogQuery {
    pub id: Uuid,
}

#[instrument(skip(state))]
pub async fn get_catalog_templates(
    state: web::Data<AppState>,
    query: web::Query<CatalogQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    if let Some(id) = query.id {
        let template = state.catalog.get_template(id).await?;
        return Ok(ApiSuccess::ok(json!({ "template": template })));
    }

    let (page, per_page) = page_bounds(query.page, query.per_page);
    let filter = CatalogFilter {
        category: query.category.map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty()),
        search: query.search.filter(|s| !s.trim().is_empty()),
        page,
        per_page,
    };
    let templates = state.catalog.list_templates(filter).await?;
    Ok(ApiSuccess::ok(templates))
}

#[instrument(skip(state, data))]
pub async fn create_catalog_template(
    state: web::Data<AppState>,
    data: web::Json<NewCatalogTemplateRequest>,
) -> Result<impl Responder, AppError> {
    let template = state.catalog.create_template(data.into_inner()).await?;
    Ok(ApiSuccess::created(json!({ "template": template })))
}

#[instrument(skip(state, data))]
pub async fn update_catalog_template(
    state: web::Data<AppState>,
    data: web::Json<UpdateCatalogTemplateRequest>,
) -> Result<impl Responder, AppError> {
    let template = state.catalog.update_template(data.into_inner()).await?;
    Ok(ApiSuccess::ok(json!({ "template": template })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_catalog_template(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    query: web::Query<DeleteCatalogQuery>,
) -> Result<HttpResponse, AppError> {
    state.catalog.delete_template(query.id).await?;
    Ok(ApiSuccess::ok(json!({ "message": "Catalog template deleted" })))
}
