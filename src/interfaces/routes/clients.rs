use actix_web::web;

use crate::handlers::{clients, content};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/create-client").route(web::post().to(clients::create_client)))
        .service(
            web::resource("/clients")
                .route(web::get().to(clients::get_clients))
                .route(web::put().to(clients::update_client))
                .route(web::delete().to(clients::delete_client)),
        )
        .service(
            web::resource("/client-content")
                .route(web::get().to(content::get_client_content))
                .route(web::post().to(content::replace_client_content))
                .route(web::patch().to(content::patch_client_content))
                .route(web::delete().to(content::delete_client_content)),
        );
}
