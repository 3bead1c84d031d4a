//! Parsing of the model's match output.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::error::AiError;
use crate::models::AssignmentMatch;

/// Characters of raw output quoted back in parse errors.
const EXCERPT_CHARS: usize = 200;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\s*```").expect("valid fence regex")
});

#[derive(Deserialize)]
struct MatchEnvelope {
    matches: Vec<AssignmentMatch>,
}

/// Remove Markdown code fences around a model answer.
///
/// If the text holds a fenced block, its body is returned. A dangling opening
/// fence with no closing one is dropped on its own.
pub fn strip_code_fences(text: &str) -> String {
    let text = text.trim();
    if let Some(body) = FENCED_BLOCK.captures(text).and_then(|c| c.get(1)) {
        return body.as_str().trim().to_string();
    }
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        return rest.trim().to_string();
    }
    text.to_string()
}

/// Parse `{"matches": [...]}` out of a model response.
///
/// Each match must carry all four fields with a known confidence level and an
/// RFC 3339 due date.
pub fn parse_matches(raw: &str) -> Result<Vec<AssignmentMatch>, AiError> {
    let cleaned = strip_code_fences(raw);
    let parse_error = |reason: String| AiError::Parse {
        reason,
        excerpt: cleaned.chars().take(EXCERPT_CHARS).collect(),
    };

    let envelope: MatchEnvelope =
        serde_json::from_str(&cleaned).map_err(|e| parse_error(e.to_string()))?;

    for m in &envelope.matches {
        if chrono::DateTime::parse_from_rfc3339(&m.matched_due_date).is_err() {
            return Err(parse_error(format!(
                "invalid due date '{}' for '{}'",
                m.matched_due_date, m.assignment_name
            )));
        }
    }

    Ok(envelope.matches)
}
