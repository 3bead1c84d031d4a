use thiserror::Error;

use crate::ai::AiError;
use crate::session::SessionError;

/// Why a wizard action failed. Rendered to the user as-is.
#[derive(Error, Debug)]
pub enum WizardError {
    /// A required form field was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The session lacks setup from an earlier step.
    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl WizardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
