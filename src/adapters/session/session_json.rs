//! Implements SessionStore using a JSON file.
//!
//! Holds the opaque token and user identity between runs. The token is never
//! inspected, only stored and replayed.

use crate::domain::{DomainError, Session};
use crate::ports::SessionStore;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// JSON file-based session storage.
pub struct SessionJson {
    path: std::path::PathBuf,
}

impl SessionJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Atomic save using write-replace pattern:
    /// 1. Write to temp file
    /// 2. sync_all() to ensure flush to disk
    /// 3. Atomic rename to target path
    async fn write_atomic(&self, json: &str) -> Result<(), DomainError> {
        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Session(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Session(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Session(format!("sync temp file: {}", e)))?;
        drop(f);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Session(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStore for SessionJson {
    async fn load(&self) -> Result<Option<Session>, DomainError> {
        match fs::read_to_string(&self.path).await {
            Ok(s) => Ok(serde_json::from_str(&s).ok()),
            Err(_) => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| DomainError::Session(e.to_string()))?;
        self.write_atomic(&json).await
    }

    async fn clear(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Session(format!("remove session file: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionJson {
        let path = std::env::temp_dir().join(format!("splitfair-session-{}.json", name));
        SessionJson::new(path)
    }

    #[tokio::test]
    async fn test_save_load_clear_roundtrip() {
        let store = temp_store("roundtrip");
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());

        let session = Session {
            token: "opaque".into(),
            user_id: 9,
            username: Some("alice".into()),
        };
        store.save(&session).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.token, "opaque");
        assert_eq!(loaded.user_id, 9);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = temp_store("idempotent");
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }
}
