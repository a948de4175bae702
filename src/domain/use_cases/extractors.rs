use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Deserialize;

use crate::{errors::AppError, utils::get_client_ip::get_client_ip, AppState};

/// Guard for DELETE handlers: the query string must carry `confirm=true`.
/// Rejects with 400 before any storage is touched.
/// Usage: add `_confirmed: ConfirmDelete` as a handler parameter.
#[derive(Debug)]
pub struct ConfirmDelete;

#[derive(Deserialize)]
struct ConfirmQuery {
    confirm: Option<String>,
}

impl FromRequest for ConfirmDelete {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let confirmed = web::Query::<ConfirmQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().confirm)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        match confirmed {
            true => ready(Ok(ConfirmDelete)),
            false => ready(Err(AppError::InvalidInput("Deletion requires confirmation".into()))),
        }
    }
}

/// Caller address used as the rate-limit key for public submissions.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl FromRequest for ClientIp {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let trust_forwarded = req
            .app_data::<web::Data<AppState>>()
            .is_some_and(|state| state.config.trust_x_forwarded_for);
        ready(Ok(ClientIp(get_client_ip(req, trust_forwarded))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn delete_without_confirm_is_refused() {
        let req = TestRequest::delete().uri("/api/custom-themes?themeId=lavender").to_http_request();
        let err = ConfirmDelete::extract(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "Deletion requires confirmation");

        let req = TestRequest::delete().uri("/api/custom-themes?themeId=lavender&confirm=false").to_http_request();
        assert!(ConfirmDelete::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn confirm_true_is_accepted() {
        let req = TestRequest::delete().uri("/api/custom-themes?themeId=lavender&confirm=true").to_http_request();
        assert!(ConfirmDelete::extract(&req).await.is_ok());
    }

    #[actix_web::test]
    async fn client_ip_without_state_uses_peer_address() {
        let req = TestRequest::default()
            .peer_addr("203.0.113.9:5555".parse().unwrap())
            .insert_header(("X-Forwarded-For", "198.51.100.1"))
            .to_http_request();
        let ClientIp(ip) = ClientIp::extract(&req).await.unwrap();
        assert_eq!(ip, "203.0.113.9");
    }
}
