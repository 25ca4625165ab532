//! In-memory session bookkeeping
//!
//! Provides conversation state management with:
//! - Thread-safe storage (DashMap, per-entry locking)
//! - Lazy expiry sweep before session resolution
//! - History-conditioned prompt assembly

mod prompt;
mod store;
mod types;

pub use prompt::render_prompt;
pub use store::SessionStore;
pub use types::{Role, Session, Turn};
