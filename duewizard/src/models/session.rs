//! Session model holding everything the wizard remembers between requests.

use serde::{Deserialize, Serialize};

use super::AssignmentMatch;

/// Wizard step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    /// API key setup.
    #[default]
    ApiSetup = 1,
    /// AI matching of the pasted assignment list.
    Matching = 2,
    /// Pushing dates to Canvas.
    CanvasUpdate = 3,
}

impl WizardStep {
    pub const ALL: [Self; 3] = [Self::ApiSetup, Self::Matching, Self::CanvasUpdate];

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::ApiSetup => "API Setup",
            Self::Matching => "Match Assignments",
            Self::CanvasUpdate => "Update Canvas",
        }
    }

    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::ApiSetup),
            2 => Some(Self::Matching),
            3 => Some(Self::CanvasUpdate),
            _ => None,
        }
    }

    /// Parse a step from a form value such as `"2"`.
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<u8>().ok().and_then(Self::from_number)
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| format!("invalid wizard step {value}"))
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// AI text-generation provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    Claude,
}

impl AiProvider {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Claude => "claude",
        }
    }

    /// Human-readable provider name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::Claude => "Claude",
        }
    }

    /// The provider used as fallback for this one.
    pub const fn alternate(self) -> Self {
        match self {
            Self::Gemini => Self::Claude,
            Self::Claude => Self::Gemini,
        }
    }

    /// Parse a provider from a form value. Anything unrecognized is Gemini.
    pub fn from_form(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Self::Claude,
            _ => Self::Gemini,
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Server-side wizard state for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardSession {
    pub current_step: WizardStep,
    pub gemini_key: String,
    pub claude_key: String,
    pub ai_provider: AiProvider,
    /// Assignment names pasted from Canvas.
    pub assignment_list: String,
    /// Generated schedule the AI matched against.
    pub due_dates: String,
    pub matches: Vec<AssignmentMatch>,
    /// Errors from the last Canvas run, shown once.
    pub canvas_errors: Vec<String>,
    pub canvas_url: String,
    pub course_id: String,
}

impl WizardSession {
    /// Whether at least one provider key is configured.
    pub fn has_any_key(&self) -> bool {
        !self.gemini_key.is_empty() || !self.claude_key.is_empty()
    }

    /// Key for the given provider, if configured.
    pub fn key_for(&self, provider: AiProvider) -> Option<&str> {
        let key = match provider {
            AiProvider::Gemini => &self.gemini_key,
            AiProvider::Claude => &self.claude_key,
        };
        (!key.is_empty()).then_some(key.as_str())
    }
}
