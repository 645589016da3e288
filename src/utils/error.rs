use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg)
            }
            ApiError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, "ValidationError", msg)
            }
            ApiError::Internal(msg) => {
                // Detail stays in the logs, callers get an opaque body.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "Problem on the server. See logs.".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_body_names_the_error() {
        let body = body_json(ApiError::NotFound("Company not found".into())).await;
        assert_eq!(body["error"], "NotFound");
        assert_eq!(body["message"], "Company not found");
    }

    #[tokio::test]
    async fn internal_error_body_is_opaque() {
        let body = body_json(ApiError::Internal(
            "connection refused: 127.0.0.1:5432".into(),
        ))
        .await;
        assert_eq!(body["error"], "InternalError");
        assert_eq!(body["message"], "Problem on the server. See logs.");
        // The storage detail must stay out of the response.
        assert!(!body["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[test]
    fn status_codes_match_taxonomy() {
        let cases = [
            (
                ApiError::Unauthorized("denied".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::NotFound("Company not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Validation("radius out of range".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Internal("pool timeout".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
