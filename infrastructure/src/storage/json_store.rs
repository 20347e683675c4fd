//! JSON file session store
//!
//! One pretty-printed JSON file per session under the data directory,
//! named `session_<id>.json`. The whole session aggregate is rewritten on
//! every save; there is no partial update.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use voter_application::ports::session_store::{SessionStore, StoreError};
use voter_domain::Session;

const FILE_PREFIX: &str = "session_";
const FILE_SUFFIX: &str = ".json";

/// File-backed [`SessionStore`] storing each session as a JSON document.
pub struct JsonSessionStore {
    data_dir: PathBuf,
}

impl JsonSessionStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{FILE_PREFIX}{id}{FILE_SUFFIX}"))
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn load(&self, id: &str) -> Result<Session, StoreError> {
        let path = self.session_path(id);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(serde_json::from_str(&json)?)
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let path = self.session_path(&session.id);
        let json = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&path, json).await?;
        debug!(session_id = %session.id, path = %path.display(), "Session saved");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Session>, StoreError> {
        let mut sessions = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(FILE_PREFIX) || !name.ends_with(FILE_SUFFIX) {
                continue;
            }

            // Unreadable or malformed files are skipped, not fatal
            match tokio::fs::read_to_string(entry.path()).await {
                Ok(json) => match serde_json::from_str::<Session>(&json) {
                    Ok(session) => sessions.push(session),
                    Err(e) => {
                        warn!(file = name, error = %e, "Skipping malformed session file");
                    }
                },
                Err(e) => {
                    warn!(file = name, error = %e, "Skipping unreadable session file");
                }
            }
        }

        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sessions)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.session_path(id)).await {
            Ok(()) => Ok(()),
            // Deleting a missing session is a no-op
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, JsonSessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::new(dir.path().join("sessions")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let (_dir, store) = store();
        let mut session = Session::new("s1", "Test", 2, 10).unwrap();
        session
            .start_decision("d1", "pick", vec!["A".into(), "B".into()])
            .unwrap();

        store.save(&session).await.unwrap();

        let loaded = store.load("s1").await.unwrap();
        assert_eq!(loaded.id, "s1");
        assert_eq!(loaded.k, 2);
        assert_eq!(loaded.decisions.len(), 1);
        assert_eq!(loaded.decisions[0].votes.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_session() {
        let (_dir, store) = store();
        let result = store.load("ghost").await;
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_list_skips_malformed_files() {
        let (_dir, store) = store();
        store
            .save(&Session::new("a", "A", 2, 10).unwrap())
            .await
            .unwrap();
        store
            .save(&Session::new("b", "B", 2, 10).unwrap())
            .await
            .unwrap();
        tokio::fs::write(store.data_dir().join("session_bad.json"), "not json")
            .await
            .unwrap();
        tokio::fs::write(store.data_dir().join("notes.txt"), "ignored")
            .await
            .unwrap();

        let sessions = store.list().await.unwrap();
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = store();
        store
            .save(&Session::new("a", "A", 2, 10).unwrap())
            .await
            .unwrap();

        store.delete("a").await.unwrap();
        assert!(matches!(
            store.load("a").await,
            Err(StoreError::NotFound(_))
        ));

        // Second delete is a no-op
        store.delete("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let (_dir, store) = store();
        let mut session = Session::new("s1", "Test", 2, 10).unwrap();
        store.save(&session).await.unwrap();

        session
            .start_decision("d1", "pick", vec!["A".into(), "B".into()])
            .unwrap();
        store.save(&session).await.unwrap();

        let loaded = store.load("s1").await.unwrap();
        assert_eq!(loaded.decisions.len(), 1);
    }
}
