use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::utils::error::ApiError;

use super::prompt;
use super::types::{Session, Turn};

/// Process-wide session storage. DashMap gives per-entry locking, so
/// history mutation and prompt assembly are guarded per session while the
/// slow retriever call runs with no lock held.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(timeout: Duration) -> Self {
        info!(timeout_seconds = timeout.num_seconds(), "Initializing session store");
        Self {
            sessions: DashMap::new(),
            timeout,
        }
    }

    /// Removes every session idle longer than the configured timeout.
    /// Runs before session resolution on every request, so expired
    /// sessions are never resumed. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !session.is_expired(now, self.timeout));
        let removed = before.saturating_sub(self.sessions.len());

        if removed > 0 {
            info!(removed, "Swept expired sessions");
        }
        removed
    }

    /// Returns the id of the session this request operates on. A known id
    /// resumes its session and refreshes `last_active`; an absent or
    /// unknown id gets a freshly generated identity with empty history.
    pub fn resolve(&self, requested: Option<&str>) -> String {
        if let Some(id) = requested {
            if let Some(mut entry) = self.sessions.get_mut(id) {
                entry.touch();
                debug!(session_id = %id, "Resumed existing session");
                return id.to_string();
            }
        }

        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), Session::new(id.clone()));
        debug!(session_id = %id, "Created new session");
        id
    }

    pub fn append_turn(&self, id: &str, turn: Turn) -> Result<(), ApiError> {
        let mut entry = self.sessions.get_mut(id).ok_or_else(|| {
            ApiError::Internal(format!("Session {} disappeared mid-request", id))
        })?;
        entry.append(turn);
        Ok(())
    }

    /// Builds the retriever prompt from the session's history. The entry
    /// guard is held for the duration so a concurrent append cannot tear
    /// the snapshot.
    pub fn render_prompt(
        &self,
        id: &str,
        system_instruction: &str,
    ) -> Result<String, ApiError> {
        let entry = self.sessions.get(id).ok_or_else(|| {
            ApiError::Internal(format!("Session {} disappeared mid-request", id))
        })?;
        Ok(prompt::render_prompt(system_instruction, &entry.history))
    }

    pub fn history(&self, id: &str) -> Option<Vec<Turn>> {
        self.sessions.get(id).map(|entry| entry.history.clone())
    }

    pub fn last_active(&self, id: &str) -> Option<DateTime<Utc>> {
        self.sessions.get(id).map(|entry| entry.last_active)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Duration::minutes(30))
    }

    fn backdate(store: &SessionStore, id: &str, idle: Duration) {
        store.sessions.get_mut(id).unwrap().last_active = Utc::now() - idle;
    }

    #[test]
    fn test_resolve_without_id_creates_session() {
        let store = store();
        let id = store.resolve(None);

        assert_eq!(store.len(), 1);
        assert!(store.contains(&id));
        assert!(store.history(&id).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_unknown_id_creates_fresh_identity() {
        let store = store();
        let id = store.resolve(Some("never-issued"));

        assert_ne!(id, "never-issued");
        assert!(!store.contains("never-issued"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_resolve_known_id_keeps_store_size_and_refreshes() {
        let store = store();
        let id = store.resolve(None);
        backdate(&store, &id, Duration::minutes(5));
        let before = store.last_active(&id).unwrap();

        let resolved = store.resolve(Some(&id));

        assert_eq!(resolved, id);
        assert_eq!(store.len(), 1);
        assert!(store.last_active(&id).unwrap() >= before);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let store = store();
        let first = store.resolve(None);
        let second = store.resolve(None);

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_append_turn_grows_history() {
        let store = store();
        let id = store.resolve(None);

        store.append_turn(&id, Turn::user("hello")).unwrap();
        store.append_turn(&id, Turn::assistant("hi")).unwrap();

        let history = store.history(&id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Turn::user("hello"));
        assert_eq!(history[1], Turn::assistant("hi"));
    }

    #[test]
    fn test_append_turn_to_missing_session_errors() {
        let store = store();
        let result = store.append_turn("ghost", Turn::user("hello"));
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }

    #[test]
    fn test_sweep_removes_only_expired_sessions() {
        let store = store();
        let stale = store.resolve(None);
        let fresh = store.resolve(None);
        backdate(&store, &stale, Duration::minutes(31));

        let removed = store.sweep_expired();

        assert_eq!(removed, 1);
        assert!(!store.contains(&stale));
        assert!(store.contains(&fresh));
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let store = store();
        let stale = store.resolve(None);
        store.resolve(None);
        backdate(&store, &stale, Duration::hours(1));

        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.sweep_expired(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expired_id_resolves_to_new_session_after_sweep() {
        let store = store();
        let old = store.resolve(None);
        store.append_turn(&old, Turn::user("remember me")).unwrap();
        backdate(&store, &old, Duration::hours(2));

        store.sweep_expired();
        let replacement = store.resolve(Some(&old));

        assert_ne!(replacement, old);
        assert!(store.history(&replacement).unwrap().is_empty());
    }

    #[test]
    fn test_render_prompt_reads_current_history() {
        let store = store();
        let id = store.resolve(None);
        store.append_turn(&id, Turn::user("What about hostels?")).unwrap();

        let prompt = store.render_prompt(&id, "Be concise.").unwrap();

        assert!(prompt.starts_with("Be concise.\n"));
        assert!(prompt.contains("User: What about hostels?"));
        assert!(prompt.ends_with("Assistant:"));
    }
}
