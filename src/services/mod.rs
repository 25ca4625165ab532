pub mod intent;
pub mod knowledge;
pub mod retriever;
pub mod session;

pub use intent::QueryIntent;
pub use retriever::{GeminiRetriever, KnowledgeRetriever};
pub use session::SessionStore;
