use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    HttpResponse, ResponseError,
};
use serde_json::json;

/// Extractor failures (malformed JSON, query or path) in the API envelope.
#[derive(Debug)]
pub struct RequestShapeError {
    message: String,
    status: StatusCode,
}

impl std::fmt::Display for RequestShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for RequestShapeError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(json!({
            "success": false,
            "error": "validation_error",
            "message": self.message,
        }))
    }
}

impl From<JsonPayloadError> for RequestShapeError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
                RequestShapeError {
                    message: format!(
                        "Request body exceeds {} MB; send large background images one section at a time",
                        limit / (1024 * 1024)
                    ),
                    status: StatusCode::PAYLOAD_TOO_LARGE,
                }
            }
            _ => RequestShapeError { message: format!("Invalid JSON body: {}", err), status: StatusCode::BAD_REQUEST },
        }
    }
}

impl From<QueryPayloadError> for RequestShapeError {
    fn from(err: QueryPayloadError) -> Self {
        RequestShapeError { message: format!("Invalid query string: {}", err), status: StatusCode::BAD_REQUEST }
    }
}

impl From<PathError> for RequestShapeError {
    fn from(err: PathError) -> Self {
        RequestShapeError { message: format!("Invalid path: {}", err), status: StatusCode::BAD_REQUEST }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_body_is_413() {
        let err = RequestShapeError::from(JsonPayloadError::Overflow { limit: 64 * 1024 * 1024 });
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.to_string().starts_with("Request body exceeds 64 MB"));
    }
}
