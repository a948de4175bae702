use actix_web::web;

use crate::handlers::{guests, invitation};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/guestbook")
            .route(web::get().to(guests::get_guestbook))
            .route(web::post().to(guests::sign_guestbook))
            .route(web::delete().to(guests::delete_guestbook_entry)),
    )
    .service(
        web::resource("/rsvp")
            .route(web::get().to(guests::get_rsvps))
            .route(web::post().to(guests::submit_rsvp))
            .route(web::delete().to(guests::delete_rsvp)),
    )
    .service(web::resource("/invitation/{slug}").route(web::get().to(invitation::get_invitation)));
}
