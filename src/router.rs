use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Settings;
use crate::handlers;
use crate::security::{self, ApiKeyValidator};
use crate::services::retriever::KnowledgeRetriever;
use crate::services::session::SessionStore;

pub fn build_router(
    store: Arc<SessionStore>,
    retriever: Arc<dyn KnowledgeRetriever>,
    api_keys: Arc<ApiKeyValidator>,
    settings: Arc<Settings>,
) -> Router {
    // Public routes (no security)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    // Protected routes (credential checked before any session state moves)
    let protected_routes = Router::new()
        .route("/chat", post(handlers::chat::chat_handler))
        .layer(middleware::from_fn(security::middleware::require_api_key))
        .layer(Extension(store))
        .layer(Extension(retriever))
        .layer(Extension(api_keys))
        .layer(Extension(settings));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // CORS wide open for the web/Flutter clients. Restrict in production!
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http())
}
