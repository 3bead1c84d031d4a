//! Pluggable storage for wizard sessions.
//!
//! The server loads a session at the start of each request and saves it at the
//! end. Two backends ship: an in-memory map and one JSON file per session.

mod file;
mod memory;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::WizardSession;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored session is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("invalid session id '{0}'")]
    InvalidId(String),
}

/// Keyed storage for [`WizardSession`]s.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, or `None` if the id is unknown.
    async fn load(&self, id: &str) -> Result<Option<WizardSession>, SessionError>;

    async fn save(&self, id: &str, session: &WizardSession) -> Result<(), SessionError>;

    /// Forget a session. Removing an unknown id is not an error.
    async fn remove(&self, id: &str) -> Result<(), SessionError>;

    /// Drop every session not saved within `max_idle`. Returns how many went.
    async fn purge_idle(&self, max_idle: Duration) -> Result<usize, SessionError>;
}
