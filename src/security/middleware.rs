use crate::security::ApiTokenValidator;
use crate::utils::error::ApiError;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Pre-route authorization gate: checked before any handler logic runs.
pub async fn auth_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let validator = request
        .extensions()
        .get::<Arc<ApiTokenValidator>>()
        .ok_or_else(|| ApiError::Internal("API token validator not configured".to_string()))?
        .clone();

    validator.validate(request.headers())?;
    debug!("Request authorized");

    Ok(next.run(request).await)
}
