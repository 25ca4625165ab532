use serde::{Deserialize, Serialize};

// ===== REQUEST MODELS =====

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Absent or unknown ids both start a fresh session.
    #[serde(default)]
    pub session_id: Option<String>,
    pub query: String,
}

// ===== RESPONSE MODELS =====

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Returned so the caller can continue the conversation later.
    pub session_id: String,
    pub answer: String,
}
