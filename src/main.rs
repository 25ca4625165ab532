use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use pccoe_chat_api::config::Settings;
use pccoe_chat_api::router::build_router;
use pccoe_chat_api::security::ApiKeyValidator;
use pccoe_chat_api::services::knowledge;
use pccoe_chat_api::services::retriever::{GeminiRetriever, KnowledgeRetriever};
use pccoe_chat_api::services::session::SessionStore;

const SWEEP_INTERVAL_SECS: u64 = 300;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,pccoe_chat_api=debug".to_string()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("Starting PCCoE chat API...");

    // Load configuration
    let settings = Arc::new(Settings::load()?);
    info!("Configuration loaded");

    // Load the knowledge document up front, a broken document should fail
    // the process, not every request.
    let knowledge_context = knowledge::load_document(&settings.knowledge.document_path)?;

    // Initialize services
    let retriever: Arc<dyn KnowledgeRetriever> = Arc::new(GeminiRetriever::new(
        settings.gemini.clone(),
        knowledge_context,
    ));
    let store = Arc::new(SessionStore::new(settings.session.timeout()));
    let api_keys = Arc::new(ApiKeyValidator::new(settings.security.api_keys.clone()));

    // Expired sessions are swept at the start of every request; this task
    // keeps the store bounded through idle periods as well.
    let sweeper = Arc::clone(&store);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            sweeper.sweep_expired();
        }
    });

    // Build router
    let app = build_router(store, retriever, api_keys, Arc::clone(&settings));

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
