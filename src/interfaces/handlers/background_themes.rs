use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::{
        background_theme::{NewBackgroundThemeRequest, SectionImageRequest, UpdateBackgroundThemeRequest},
        response::ApiSuccess,
        section::Section,
    },
    errors::AppError,
    use_cases::extractors::ConfirmDelete,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct BackgroundThemeQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBackgroundThemeQuery {
    pub id: String,
}

#[instrument(skip(state))]
pub async fn get_background_themes(
    state: web::Data<AppState>,
    query: web::Query<BackgroundThemeQuery>,
) -> Result<impl Responder, AppError> {
    match &query.id {
        Some(id) => {
            let theme = state.background_themes.get_theme(id).await?;
            Ok(ApiSuccess::ok(json!({ "theme": theme })))
        }
        None => {
            let themes = state.background_themes.list_themes().await?;
            Ok(ApiSuccess::ok(json!({ "themes": themes })))
        }
    }
}

#[instrument(skip(state, data))]
pub async fn create_background_theme(
    state: web::Data<AppState>,
    data: web::Json<NewBackgroundThemeRequest>,
) -> Result<impl Responder, AppError> {
    let theme = state.background_themes.create_theme(data.into_inner()).await?;
    Ok(ApiSuccess::created(json!({ "theme": theme })))
}

#[instrument(skip(state, data))]
pub async fn update_background_theme(
    state: web::Data<AppState>,
    data: web::Json<UpdateBackgroundThemeRequest>,
) -> Result<impl Responder, AppError> {
    let theme = state.background_themes.update_theme(data.into_inner()).await?;
    Ok(ApiSuccess::ok(json!({ "theme": theme })))
}

#[instrument(skip(state, data))]
pub async fn put_section_background(
    state: web::Data<AppState>,
    path: web::Path<(String, Section)>,
    data: web::Json<SectionImageRequest>,
) -> Result<impl Responder, AppError> {
    let (id, section) = path.into_inner();
    let theme = state
        .background_themes
        .set_section_background(&id, section, data.into_inner().image)
        .await?;
    Ok(ApiSuccess::ok(json!({ "theme": theme })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_background_theme(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    query: web::Query<DeleteBackgroundThemeQuery>,
) -> Result<HttpResponse, AppError> {
    state.background_themes.delete_theme(&query.id).await?;
    Ok(ApiSuccess::ok(json!({ "message": "Background theme deleted" })))
}
