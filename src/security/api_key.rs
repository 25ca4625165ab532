use crate::utils::error::ApiError;
use axum::http::HeaderMap;
use std::collections::HashSet;
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Validates the shared-secret `x-api-key` header against the accepted set.
#[derive(Debug, Clone)]
pub struct ApiKeyValidator {
    accepted: HashSet<String>,
}

impl ApiKeyValidator {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        let accepted: HashSet<String> = keys
            .into_iter()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();

        if accepted.is_empty() {
            warn!("No API keys configured, every request will be rejected");
        }

        Self { accepted }
    }

    pub fn validate(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let key = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing x-api-key header".to_string()))?;

        if !self.accepted.contains(key) {
            warn!("Rejected request with unrecognized API key");
            return Err(ApiError::Unauthorized("Invalid API key".to_string()));
        }

        debug!("API key accepted");
        Ok(())
    }
}
