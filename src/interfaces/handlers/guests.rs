use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{guestbook::NewGuestbookEntry, response::ApiSuccess, rsvp::NewRsvpRequest},
    errors::AppError,
    use_cases::extractors::{ClientIp, ConfirmDelete},
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestQuery {
    pub client_slug: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteGuestQuery {
    pub id: Uuid,
}

#[instrument(skip(state))]
pub async fn get_guestbook(
    state: web::Data<AppState>,
    query: web::Query<GuestQuery>,
) -> Result<impl Responder, AppError> {
    let entries = state.guests.list_guestbook(&query.client_slug).await?;
    Ok(ApiSuccess::ok(json!({ "entries": entries })))
}

#[instrument(skip(state, data))]
pub async fn sign_guestbook(
    state: web::Data<AppState>,
    ClientIp(ip): ClientIp,
    data: web::Json<NewGuestbookEntry>,
) -> Result<impl Responder, AppError> {
    let entry = state.guests.sign_guestbook(data.into_inner(), &ip).await?;
    Ok(ApiSuccess::created(json!({ "entry": entry })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_guestbook_entry(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    query: web::Query<DeleteGuestQuery>,
) -> Result<HttpResponse, AppError> {
    state.guests.delete_guestbook_entry(query.id).await?;
    Ok(ApiSuccess::ok(json!({ "message": "Guestbook entry deleted" })))
}

#[instrument(skip(state))]
pub async fn get_rsvps(
    state: web::Data<AppState>,
    query: web::Query<GuestQuery>,
) -> Result<impl Responder, AppError> {
    let listing = state.guests.list_rsvps(&query.client_slug).await?;
    Ok(ApiSuccess::ok(listing))
}

#[instrument(skip(state, data))]
pub async fn submit_rsvp(
    state: web::Data<AppState>,
    ClientIp(ip): ClientIp,
    data: web::Json<NewRsvpRequest>,
) -> Result<impl Responder, AppError> {
    let rsvp = state.guests.submit_rsvp(data.into_inner(), &ip).await?;
    Ok(ApiSuccess::created(json!({ "rsvp": rsvp })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_rsvp(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    query: web::Query<DeleteGuestQuery>,
) -> Result<HttpResponse, AppError> {
    state.guests.delete_rsvp(query.id).await?;
    Ok(ApiSuccess::ok(json!({ "message": "RSVP deleted" })))
}
