use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::{
        color_theme::{NewCustomThemeRequest, UpdateCustomThemeRequest},
        response::ApiSuccess,
    },
    errors::AppError,
    use_cases::extractors::ConfirmDelete,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomThemeQuery {
    pub theme_id: Option<String>,
    #[serde(default)]
    pub refresh: bool,
    #[serde(default)]
    pub include_backgrounds: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCustomThemeQuery {
    pub theme_id: String,
}

#[instrument(skip(state))]
pub async fn get_custom_themes(
    state: web::Data<AppState>,
    query: web::Query<CustomThemeQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    let handler = &state.custom_themes;

    match query.theme_id {
        Some(theme_id) => {
            let theme = handler.get_theme(&theme_id, query.include_backgrounds).await?;
            Ok(ApiSuccess::ok(json!({ "theme": theme })))
        }
        None => {
            let themes = handler.list_themes(query.refresh, query.include_backgrounds).await?;
            Ok(ApiSuccess::ok(json!({ "themes": themes })))
        }
    }
}

#[instrument(skip(state, data))]
pub async fn create_custom_theme(
    state: web::Data<AppState>,
    data: web::Json<NewCustomThemeRequest>,
) -> Result<impl Responder, AppError> {
    let theme = state.custom_themes.create_theme(data.into_inner()).await?;
    Ok(ApiSuccess::created(json!({ "theme": theme, "message": "Theme created" })))
}

#[instrument(skip(state, data))]
pub async fn update_custom_theme(
    state: web::Data<AppState>,
    data: web::Json<UpdateCustomThemeRequest>,
) -> Result<impl Responder, AppError> {
    let theme = state.custom_themes.update_theme(data.into_inner()).await?;
    Ok(ApiSuccess::ok(json!({ "theme": theme })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_custom_theme(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    query: web::Query<DeleteCustomThemeQuery>,
) -> Result<HttpResponse, AppError> {
    state.custom_themes.delete_theme(&query.theme_id).await?;
    Ok(ApiSuccess::ok(json!({ "message": "Theme deleted" })))
}
