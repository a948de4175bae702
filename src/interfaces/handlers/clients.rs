use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::{
        client::{ClientListQuery, CreateClientRequest, UpdateClientRequest},
        response::{page_bounds, ApiSuccess},
    },
    errors::AppError,
    use_cases::extractors::ConfirmDelete,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuery {
    pub slug: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteClientQuery {
    pub slug: String,
}

#[instrument(skip(state, data))]
pub async fn create_client(
    state: web::Data<AppState>,
    data: web::Json<CreateClientRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.clients.create_client(data.into_inner()).await?;
    Ok(ApiSuccess::created(response))
}

#[instrument(skip(state))]
pub async fn get_clients(
    state: web::Data<AppState>,
    query: web::Query<ClientQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    if let Some(slug) = query.slug {
        let client = state.clients.get_client(&slug).await?;
        return Ok(ApiSuccess::ok(json!({ "client": client })));
    }

    let (page, per_page) = page_bounds(query.page, query.per_page);
    let clients = state
        .clients
        .list_clients(ClientListQuery { search: query.search, page, per_page })
        .await?;
    Ok(ApiSuccess::ok(clients))
}

#[instrument(skip(state, data))]
pub async fn update_client(
    state: web::Data<AppState>,
    data: web::Json<UpdateClientRequest>,
) -> Result<impl Responder, AppError> {
    let client = state.clients.update_client(data.into_inner()).await?;
    Ok(ApiSuccess::ok(json!({ "client": client })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_client(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    query: web::Query<DeleteClientQuery>,
) -> Result<HttpResponse, AppError> {
    state.clients.delete_client(&query.slug).await?;
    Ok(ApiSuccess::ok(json!({ "message": "Client deleted" })))
}
