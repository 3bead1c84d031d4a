//! Prompt templates.

use std::fmt::Write;

use crate::dates;
use crate::models::AssignmentMatch;

/// Session data the chat assistant gets to see.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatContext<'a> {
    pub assignment_list: &'a str,
    pub schedule: &'a str,
    pub matches: &'a [AssignmentMatch],
}

impl ChatContext<'_> {
    /// Render the context block embedded in the chat prompt.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.assignment_list.is_empty() {
            let _ = write!(out, "\n\nCANVAS ASSIGNMENTS:\n{}", self.assignment_list);
        }
        if !self.schedule.is_empty() {
            let _ = write!(out, "\n\nDUE DATE SCHEDULE:\n{}", self.schedule);
        }
        if !self.matches.is_empty() {
            out.push_str("\n\nCURRENT MATCHES:\n");
            for (i, m) in self.matches.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}. {} → {} (Confidence: {})",
                    i + 1,
                    m.assignment_name,
                    dates::display(&m.matched_due_date, dates::LONG_WITH_TIME),
                    m.confidence
                );
                let _ = writeln!(out, "   Reasoning: {}\n", m.reasoning);
            }
        }
        out
    }
}

pub fn match_prompt(assignment_list: &str, schedule: &str) -> String {
    format!(
        r#"You are an expert at matching Canvas assignment lists with due date schedules for academic courses.

CANVAS ASSIGNMENTS LIST:
{assignment_list}

DUE DATE SCHEDULE:
{schedule}

Analyze both lists and match every assignment with its intended due date.

IMPORTANT INSTRUCTIONS:
1. Look for semantic similarities, not just exact text matches
2. Consider abbreviations, partial names, and context
3. Match assignments with the most appropriate due dates based on content and sequence
4. If an assignment appears to be a quiz, match it with quiz due dates
5. If an assignment is clearly a project, match it with project due dates

Return your matches in this EXACT JSON format:
{{
  "matches": [
    {{
      "assignment_name": "Exact Canvas assignment name",
      "matched_due_date": "YYYY-MM-DDTHH:MM:SS-04:00",
      "confidence": "high|medium|low",
      "reasoning": "Brief explanation of why this match was made"
    }}
  ]
}}

Only return valid JSON. Do not include any other text or formatting."#
    )
}

pub fn chat_prompt(question: &str, context: &ChatContext<'_>) -> String {
    let context = context.render();
    format!(
        "You are a helpful AI assistant for Canvas assignment management. The user is preparing \
for the Fall 2025 semester (August-December 2025).

Your role is to:
1. Help generate typical Fall 2025 academic schedules when requested
2. Suggest realistic due dates for Fall 2025 semester assignments
3. Help match existing assignments with new due date schedules
4. Recommend when they should proceed to update Canvas
5. Consider the typical Fall calendar (late August start, Thanksgiving break, December finals)

When users ask for schedule generation:
- Assume the Fall 2025 semester runs August 26 - December 13, 2025
- Include typical academic breaks (Labor Day, Fall Break, Thanksgiving week)
- Space assignments appropriately throughout the semester
- Use realistic due times (usually 11:59 PM)

CONTEXT:{context}

USER QUESTION: {question}

Give helpful, specific advice for Fall 2025 scheduling. Always write dates like \
2025-09-15T23:59:00-04:00."
    )
}

pub fn suggest_prompt(assignment_list: &str, schedule: &str) -> String {
    format!(
        "You are helping a user match Canvas assignments with due dates. Suggest 3-5 good \
matches they should consider and explain why.

CANVAS ASSIGNMENTS:
{assignment_list}

DUE DATE SCHEDULE:
{schedule}

Write conversational suggestions such as:
'I recommend matching [Assignment X] with [Date Y] because...'
'You might want to consider...'
'The assignment [Z] looks like it should be due on...'

Be helpful and specific."
    )
}
