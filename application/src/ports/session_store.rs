//! Session persistence port
//!
//! The durable-store collaborator. Implementations live in the
//! infrastructure layer; the service only relies on this contract.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use voter_domain::Session;

/// Errors from the persistence collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize session: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable load/save contract for sessions.
///
/// `list` is best-effort: entries that fail to deserialize are skipped.
/// `delete` is idempotent: removing a missing entry is not an error.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<Session, StoreError>;

    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Session>, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral runs.
///
/// Keeps serialized snapshots only, so callers observe the same
/// copy-on-load semantics as a file-backed store.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &str) -> Result<Session, StoreError> {
        let sessions = self.sessions.lock().expect("store lock poisoned");
        let json = sessions
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(serde_json::from_str(json)?)
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let json = serde_json::to_string(session)?;
        let mut sessions = self.sessions.lock().expect("store lock poisoned");
        sessions.insert(session.id.clone(), json);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Session>, StoreError> {
        let sessions = self.sessions.lock().expect("store lock poisoned");
        let mut result: Vec<Session> = sessions
            .values()
            .filter_map(|json| serde_json::from_str(json).ok())
            .collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(result)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().expect("store lock poisoned");
        sessions.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = InMemorySessionStore::new();
        let session = Session::new("s1", "Test", 2, 10).unwrap();

        store.save(&session).await.unwrap();
        let loaded = store.load("s1").await.unwrap();
        assert_eq!(loaded.id, "s1");
        assert_eq!(loaded.k, 2);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let store = InMemorySessionStore::new();
        assert!(matches!(
            store.load("nope").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemorySessionStore::new();
        store.delete("nope").await.unwrap();
    }
}
