use crate::utils::error::ApiError;
use axum::http::HeaderMap;
use tracing::warn;

pub const API_TOKEN_HEADER: &str = "x-api-key";

/// Flat shared-secret gate: every protected request must carry the
/// configured token in `x-api-key`.
#[derive(Debug, Clone)]
pub struct ApiTokenValidator {
    expected_token: String,
}

impl ApiTokenValidator {
    pub fn new(expected_token: String) -> Self {
        Self { expected_token }
    }

    pub fn validate(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let token = headers
            .get(API_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("Unauthorized request. Denied.".to_string())
            })?;

        if token != self.expected_token {
            warn!("Invalid {} header", API_TOKEN_HEADER);
            return Err(ApiError::Unauthorized(
                "Unauthorized request. Denied.".to_string(),
            ));
        }

        Ok(())
    }
}
