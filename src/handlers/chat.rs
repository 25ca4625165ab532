use crate::config::Settings;
use crate::models::chat::{ChatRequest, ChatResponse};
use crate::services::intent::QueryIntent;
use crate::services::retriever::KnowledgeRetriever;
use crate::services::session::{SessionStore, Turn};
use crate::utils::error::ApiError;
use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

/// The single chat operation. Per request: credential check (middleware),
/// expiry sweep, session resolution, intent classification, then either a
/// canned reply or a history-conditioned retriever call.
pub async fn chat_handler(
    Extension(store): Extension<Arc<SessionStore>>,
    Extension(retriever): Extension<Arc<dyn KnowledgeRetriever>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    store.sweep_expired();
    let session_id = store.resolve(request.session_id.as_deref());
    store.append_turn(&session_id, Turn::user(query))?;

    let intent = QueryIntent::classify(query);
    info!(
        session_id = %session_id,
        ?intent,
        query_len = query.len(),
        "Chat request"
    );

    let answer = match intent.canned_reply() {
        Some(reply) => reply.to_string(),
        None => {
            let prompt =
                store.render_prompt(&session_id, &settings.prompts.system_instruction)?;

            // On failure the user turn stays in history, but no assistant
            // turn is appended, so the next prompt carries no phantom
            // empty answer.
            retriever.ask(&prompt).await.map_err(|e| {
                warn!(session_id = %session_id, error = %e, "Knowledge retriever failed");
                ApiError::Retriever(e.to_string())
            })?
        }
    };

    store.append_turn(&session_id, Turn::assistant(answer.clone()))?;

    Ok(Json(ChatResponse { session_id, answer }))
}
