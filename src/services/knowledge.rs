use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Reads the knowledge document and verifies it is valid JSON. The raw
/// text becomes the retriever's system context, so a broken document
/// fails the process at startup instead of degrading every answer.
pub fn load_document(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read knowledge document at {}", path.display()))?;

    serde_json::from_str::<serde_json::Value>(&raw)
        .with_context(|| format!("Knowledge document at {} is not valid JSON", path.display()))?;

    info!(path = %path.display(), bytes = raw.len(), "Knowledge document loaded");
    Ok(raw)
}
