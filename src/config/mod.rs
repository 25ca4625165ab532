pub mod settings;

pub use settings::{
    GeminiConfig, KnowledgeConfig, PromptsConfig, SecurityConfig, ServerConfig, SessionConfig,
    Settings,
};
