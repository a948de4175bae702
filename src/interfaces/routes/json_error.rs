use actix_web::web;

use crate::handlers::json_error::RequestShapeError;

/// Cap on a whole JSON body. Background sets larger than this go up one
/// section at a time through `/custom-background-themes/{id}/sections/{section}`.
const JSON_LIMIT_BYTES: usize = 64 * 1024 * 1024;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(|err, _req| RequestShapeError::from(err).into()),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| RequestShapeError::from(err).into()))
    .app_data(web::PathConfig::default().error_handler(|err, _req| RequestShapeError::from(err).into()));
}
