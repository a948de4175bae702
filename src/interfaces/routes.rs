use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod catalog;
mod clients;
mod guests;
mod json_error;
mod themes;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(home).service(health_check);

    cfg.service(
        web::scope("/api")
            .configure(themes::config_routes)
            .configure(catalog::config_routes)
            .configure(clients::config_routes)
            .configure(guests::config_routes),
    );
}
