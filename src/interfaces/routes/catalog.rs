use actix_web::web;

use crate::{
    entities::asset::AssetKind,
    handlers::{assets, catalog},
};

fn asset_resource(path: &str, kind: AssetKind) -> actix_web::Resource {
    web::resource(path)
        .app_data(web::Data::new(kind))
        .route(web::get().to(assets::get_assets))
        .route(web::post().to(assets::create_asset))
        .route(web::put().to(assets::update_asset))
        .route(web::delete().to(assets::delete_asset))
}

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/catalog-templates")
            .route(web::get().to(catalog::get_catalog_templates))
            .route(web::post().to(catalog::create_catalog_template))
            .route(web::put().to(catalog::update_catalog_template))
            .route(web::delete().to(catalog::delete_catalog_template)),
    )
    .service(asset_resource("/ornament-library", AssetKind::OrnamentLibrary))
    .service(asset_resource("/bank-logos", AssetKind::BankLogo))
    .service(asset_resource("/music-library", AssetKind::Music));
}
