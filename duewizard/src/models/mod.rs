//! Data models for wizard entities.

mod assignment_match;
mod canvas;
mod session;

pub use assignment_match::{AssignmentMatch, Confidence};
pub use canvas::CanvasAssignment;
pub use session::{AiProvider, WizardSession, WizardStep};
