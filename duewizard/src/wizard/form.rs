//! Form-encoded submissions and the actions they name.

use serde::Deserialize;

use super::error::WizardError;
use crate::models::AiProvider;

/// Every field any wizard form or AJAX call may post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WizardForm {
    /// Full-page action discriminator.
    pub action: Option<String>,
    /// AJAX discriminator. Takes precedence over `action`.
    pub ajax: Option<String>,

    pub gemini_api_key: String,
    pub claude_api_key: String,
    pub ai_provider: String,
    pub assignment_list: String,
    pub canvas_url: String,
    pub api_token: String,
    pub course_id: String,
    pub target_step: String,

    pub index: String,
    pub date: String,
    pub question: String,
}

/// A full-page wizard transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetupApi {
        gemini_key: String,
        claude_key: String,
        provider: AiProvider,
    },
    MatchAssignments {
        assignment_list: String,
    },
    ProceedToCanvas,
    UpdateCanvas {
        canvas_url: String,
        api_token: String,
        course_id: String,
    },
    Reset,
    BackToStep {
        target: String,
    },
}

impl Action {
    /// The `action` value this was parsed from.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetupApi { .. } => "setup_api",
            Self::MatchAssignments { .. } => "match_assignments",
            Self::ProceedToCanvas => "proceed_to_canvas",
            Self::UpdateCanvas { .. } => "update_canvas",
            Self::Reset => "reset_wizard",
            Self::BackToStep { .. } => "back_to_step",
        }
    }

    pub fn from_form(form: WizardForm) -> Result<Self, WizardError> {
        let action = form.action.as_deref().unwrap_or_default().trim();
        let parsed = match action {
            "setup_api" => Self::SetupApi {
                gemini_key: form.gemini_api_key.trim().to_string(),
                claude_key: form.claude_api_key.trim().to_string(),
                provider: AiProvider::from_form(&form.ai_provider),
            },
            "match_assignments" => Self::MatchAssignments {
                assignment_list: form.assignment_list,
            },
            "proceed_to_canvas" => Self::ProceedToCanvas,
            "update_canvas" => Self::UpdateCanvas {
                canvas_url: form.canvas_url.trim().to_string(),
                api_token: form.api_token.trim().to_string(),
                course_id: form.course_id.trim().to_string(),
            },
            "reset_wizard" => Self::Reset,
            "back_to_step" => Self::BackToStep {
                target: form.target_step,
            },
            "" => return Err(WizardError::validation("No action given")),
            other => return Err(WizardError::validation(format!("Unknown action '{other}'"))),
        };
        Ok(parsed)
    }
}

/// A partial-page request answered with JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AjaxRequest {
    Chat { question: String },
    UpdateDate { index: String, date: String },
    Suggest,
}

impl AjaxRequest {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::UpdateDate { .. } => "update_date",
            Self::Suggest => "suggest",
        }
    }

    /// Parse the `ajax` discriminator, if the form carries one.
    pub fn from_form(form: &WizardForm) -> Option<Result<Self, WizardError>> {
        let kind = form.ajax.as_deref()?.trim();
        Some(match kind {
            "chat" => Ok(Self::Chat {
                question: form.question.clone(),
            }),
            "update_date" => Ok(Self::UpdateDate {
                index: form.index.clone(),
                date: form.date.clone(),
            }),
            "suggest" => Ok(Self::Suggest),
            other => Err(WizardError::validation(format!(
                "Unknown request '{other}'"
            ))),
        })
    }
}
