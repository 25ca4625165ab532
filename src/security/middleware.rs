use crate::security::ApiKeyValidator;
use crate::utils::error::ApiError;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Credential check, runs before any session state is touched.
pub async fn require_api_key(request: Request, next: Next) -> Result<Response, ApiError> {
    let validator = request
        .extensions()
        .get::<Arc<ApiKeyValidator>>()
        .ok_or_else(|| ApiError::Internal("API key validator not configured".to_string()))?
        .clone();

    validator.validate(request.headers())?;

    debug!("Request authenticated");
    Ok(next.run(request).await)
}
