use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::GeminiConfig;

/// Opaque capability that turns a fully assembled prompt into an answer.
/// The embedding model, the vector index and the model call all live
/// behind this seam, so tests can substitute a double that records calls.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    async fn ask(&self, prompt: &str) -> Result<String>;
}

// Minimal OpenAI-compatible request (v1beta/openai endpoint)
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: usize,
    stream: bool,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Answers prompts with Gemini, grounded in the knowledge document that
/// was loaded at startup.
pub struct GeminiRetriever {
    client: Client,
    config: GeminiConfig,
    knowledge_context: String,
}

impl GeminiRetriever {
    pub fn new(config: GeminiConfig, knowledge_context: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            config,
            knowledge_context,
        }
    }

    fn system_context(&self) -> String {
        format!(
            "Answer using only the following PCCoE knowledge document:\n\n{}",
            self.knowledge_context
        )
    }
}

#[async_trait]
impl KnowledgeRetriever for GeminiRetriever {
    async fn ask(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let system_context = self.system_context();

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: &system_context,
                },
                ChatCompletionMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Querying Gemini");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error ({}): {}", status, body));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Gemini returned no choices"))
    }
}
