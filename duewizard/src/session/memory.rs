use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SessionError, SessionStore};
use crate::models::WizardSession;

struct Entry {
    session: WizardSession,
    saved_at: Instant,
}

/// Sessions kept in process memory. Lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<WizardSession>, SessionError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(id)
            .map(|entry| entry.session.clone()))
    }

    async fn save(&self, id: &str, session: &WizardSession) -> Result<(), SessionError> {
        self.sessions.write().await.insert(
            id.to_string(),
            Entry {
                session: session.clone(),
                saved_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn purge_idle(&self, max_idle: Duration) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.saved_at.elapsed() < max_idle);
        Ok(before - sessions.len())
    }
}
