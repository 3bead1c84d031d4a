//! Canvas LMS assignment as returned by the REST API.

use serde::{Deserialize, Serialize};

/// The subset of a Canvas assignment this tool reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasAssignment {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub due_at: Option<String>,
}
