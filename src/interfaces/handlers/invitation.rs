use actix_web::{web, Responder};
use serde_json::json;
use tracing::instrument;

use crate::{entities::response::ApiSuccess, errors::AppError, AppState};

#[instrument(skip(state))]
pub async fn get_invitation(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let page = state.invitations.render(&slug).await?;
    Ok(ApiSuccess::ok(json!({ "invitation": page })))
}
