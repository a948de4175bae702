use actix_web::{web, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{constants::ORIGINAL_THEME_ID, entities::response::ApiSuccess, errors::AppError, registry, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeQuery {
    pub color_theme: Option<String>,
    pub background_theme: Option<String>,
}

pub async fn get_builtin_themes() -> impl Responder {
    ApiSuccess::ok(json!({
        "colorThemes": registry::color_themes(),
        "backgroundThemes": registry::background_themes(),
    }))
}

#[instrument(skip(state))]
pub async fn compose_theme(
    state: web::Data<AppState>,
    query: web::Query<ComposeQuery>,
) -> Result<impl Responder, AppError> {
    let color = query.color_theme.as_deref().unwrap_or(ORIGINAL_THEME_ID);
    let background = query.background_theme.as_deref().unwrap_or(ORIGINAL_THEME_ID);

    let theme = state.composer.compose(color, background).await;
    Ok(ApiSuccess::ok(json!({ "theme": theme })))
}
