use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{SessionError, SessionStore};
use crate::models::WizardSession;

/// One pretty-printed JSON file per session under a directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Create the store, making the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Default location under the user's local data directory.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("duewizard").join("sessions"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, SessionError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SessionError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, id: &str) -> Result<Option<WizardSession>, SessionError> {
        let path = self.path_for(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, id: &str, session: &WizardSession) -> Result<(), SessionError> {
        let path = self.path_for(id)?;
        let json = serde_json::to_vec_pretty(session)?;
        // Replace atomically: readers see the old file or the new one.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), "session saved");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), SessionError> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Age is taken from each file's modification time.
    async fn purge_idle(&self, max_idle: Duration) -> Result<usize, SessionError> {
        let now = SystemTime::now();
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let modified = entry.metadata().await?.modified()?;
            let idle = now.duration_since(modified).unwrap_or_default();
            if idle < max_idle {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove idle session"),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiProvider, WizardStep};

    #[tokio::test]
    async fn test_roundtrip_through_disk() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(temp.path().join("sessions")).await.unwrap();

        let session = WizardSession {
            current_step: WizardStep::CanvasUpdate,
            claude_key: "c".to_string(),
            ai_provider: AiProvider::Claude,
            ..WizardSession::default()
        };
        store.save("0191-abc", &session).await.unwrap();
        assert!(store.dir().join("0191-abc.json").exists());

        let reopened = FileSessionStore::open(temp.path().join("sessions")).await.unwrap();
        assert_eq!(reopened.load("0191-abc").await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_missing_and_removed_sessions() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(temp.path()).await.unwrap();

        assert!(store.load("nope").await.unwrap().is_none());
        store.save("s1", &WizardSession::default()).await.unwrap();
        store.remove("s1").await.unwrap();
        assert!(store.load("s1").await.unwrap().is_none());
        store.remove("s1").await.unwrap();
    }

    #[tokio::test]
    async fn test_purge_idle_removes_stale_files_only() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(temp.path()).await.unwrap();
        store.save("s1", &WizardSession::default()).await.unwrap();
        store.save("s2", &WizardSession::default()).await.unwrap();
        std::fs::write(temp.path().join("notes.txt"), "keep me").unwrap();

        assert_eq!(store.purge_idle(Duration::from_secs(3600)).await.unwrap(), 0);
        assert!(store.load("s1").await.unwrap().is_some());

        assert_eq!(store.purge_idle(Duration::ZERO).await.unwrap(), 2);
        assert!(store.load("s1").await.unwrap().is_none());
        assert!(store.load("s2").await.unwrap().is_none());
        assert!(temp.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(temp.path()).await.unwrap();

        let err = store.load("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidId(_)));
        assert!(store.save("", &WizardSession::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(temp.path()).await.unwrap();
        std::fs::write(temp.path().join("bad.json"), "{not json").unwrap();

        let err = store.load("bad").await.unwrap_err();
        assert!(matches!(err, SessionError::Corrupt(_)));
    }
}
