use actix_web::web;

use crate::handlers::{background_themes, custom_themes, themes, unified_themes};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/custom-themes")
            .route(web::get().to(custom_themes::get_custom_themes))
            .route(web::post().to(custom_themes::create_custom_theme))
            .route(web::put().to(custom_themes::update_custom_theme))
            .route(web::delete().to(custom_themes::delete_custom_theme)),
    )
    .service(
        web::resource("/custom-background-themes")
            .route(web::get().to(background_themes::get_background_themes))
            .route(web::post().to(background_themes::create_background_theme))
            .route(web::put().to(background_themes::update_background_theme))
            .route(web::delete().to(background_themes::delete_background_theme)),
    )
    .service(
        web::resource("/custom-background-themes/{id}/sections/{section}")
            .route(web::put().to(background_themes::put_section_background)),
    )
    .service(
        web::scope("/unified-themes")
            .service(
                web::resource("")
                    .route(web::get().to(unified_themes::get_unified_themes))
                    .route(web::post().to(unified_themes::create_unified_theme))
                    .route(web::put().to(unified_themes::update_unified_theme))
                    .route(web::delete().to(unified_themes::delete_unified_theme)),
            )
            .service(web::resource("/{theme_id}/ornaments").route(web::post().to(unified_themes::add_ornament)))
            .service(
                web::resource("/{theme_id}/ornaments/{ornament_id}")
                    .route(web::put().to(unified_themes::update_ornament))
                    .route(web::delete().to(unified_themes::remove_ornament)),
            ),
    )
    .service(web::resource("/themes/builtin").route(web::get().to(themes::get_builtin_themes)))
    .service(web::resource("/themes/compose").route(web::get().to(themes::compose_theme)));
}
