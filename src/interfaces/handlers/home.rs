use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Wedding invitation builder API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "invitation": "/api/invitation/{slug}",
        "health": "/health"
    }))
}
