use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::{
        ornament::OrnamentInput,
        response::ApiSuccess,
        unified_theme::{NewUnifiedThemeRequest, UpdateUnifiedThemeRequest},
    },
    errors::AppError,
    use_cases::extractors::ConfirmDelete,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedThemeQuery {
    pub id: Option<String>,
    #[serde(default)]
    pub include_ornaments: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUnifiedThemeQuery {
    pub id: String,
}

#[instrument(skip(state))]
pub async fn get_unified_themes(
    state: web::Data<AppState>,
    query: web::Query<UnifiedThemeQuery>,
) -> Result<impl Responder, AppError> {
    match &query.id {
        Some(id) => {
            let theme = state.unified_themes.get_theme(id, query.include_ornaments).await?;
            Ok(ApiSuccess::ok(json!({ "theme": theme })))
        }
        None => {
            let themes = state.unified_themes.list_themes(query.include_ornaments).await?;
            Ok(ApiSuccess::ok(json!({ "themes": themes })))
        }
    }
}

#[instrument(skip(state, data))]
pub async fn create_unified_theme(
    state: web::Data<AppState>,
    data: web::Json<NewUnifiedThemeRequest>,
) -> Result<impl Responder, AppError> {
    let theme = state.unified_themes.create_theme(data.into_inner()).await?;
    Ok(ApiSuccess::created(json!({ "theme": theme })))
}

#[instrument(skip(state, data))]
pub async fn update_unified_theme(
    state: web::Data<AppState>,
    data: web::Json<UpdateUnifiedThemeRequest>,
) -> Result<impl Responder, AppError> {
    let theme = state.unified_themes.update_theme(data.into_inner()).await?;
    Ok(ApiSuccess::ok(json!({ "theme": theme })))
}

#[instrument(skip(state, _confirmed))]
pub async fn delete_unified_theme(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    query: web::Query<DeleteUnifiedThemeQuery>,
) -> Result<HttpResponse, AppError> {
    state.unified_themes.delete_theme(&query.id).await?;
    Ok(ApiSuccess::ok(json!({ "message": "Unified theme deleted" })))
}

#[instrument(skip(state, data))]
pub async fn add_ornament(
    state: web::Data<AppState>,
    theme_id: web::Path<String>,
    data: web::Json<OrnamentInput>,
) -> Result<impl Responder, AppError> {
    let ornament = state.unified_themes.add_ornament(&theme_id, data.into_inner()).await?;
    Ok(ApiSuccess::created(json!({ "ornament": ornament })))
}

#[instrument(skip(state, data))]
pub async fn update_ornament(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    data: web::Json<OrnamentInput>,
) -> Result<impl Responder, AppError> {
    let (theme_id, ornament_id) = path.into_inner();
    let ornament = state
        .unified_themes
        .update_ornament(&theme_id, &ornament_id, data.into_inner())
        .await?;
    Ok(ApiSuccess::ok(json!({ "ornament": ornament })))
}

#[instrument(skip(state, _confirmed))]
pub async fn remove_ornament(
    _confirmed: ConfirmDelete,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (theme_id, ornament_id) = path.into_inner();
    state.unified_themes.remove_ornament(&theme_id, &ornament_id).await?;
    Ok(ApiSuccess::ok(json!({ "message": "Ornament removed" })))
}
