//! HTML for the wizard page.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::controller::Notice;
use crate::dates;
use crate::models::{AiProvider, AssignmentMatch, WizardSession, WizardStep};

const CSS: &str = include_str!("wizard.css");
const JAVASCRIPT: &str = include_str!("wizard.js");

/// Everything a render needs.
pub struct Page<'a> {
    pub session: &'a WizardSession,
    pub notice: Option<&'a Notice>,
    pub canvas_default_url: &'a str,
}

pub fn render_page(page: &Page<'_>) -> Markup {
    let session = page.session;

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Canvas Due Date Wizard" }
                style { (PreEscaped(CSS)) }
            }
            body {
                header.top-bar {
                    h1 { "Canvas Due Date Wizard" }
                    form method="post" action="/" {
                        input type="hidden" name="action" value="reset_wizard";
                        button.secondary type="submit" { "Start Over" }
                    }
                }
                main.layout {
                    section.wizard {
                        (step_indicator(session.current_step))
                        @if let Some(notice) = page.notice {
                            (alert(notice))
                        }
                        @if !session.canvas_errors.is_empty() {
                            (canvas_errors(&session.canvas_errors))
                        }
                        @match session.current_step {
                            WizardStep::ApiSetup => (api_setup_step(session)),
                            WizardStep::Matching => (matching_step(session)),
                            WizardStep::CanvasUpdate => (canvas_step(session, page.canvas_default_url)),
                        }
                    }
                    (chat_sidebar(session))
                }
                script { (PreEscaped(JAVASCRIPT)) }
            }
        }
    }
}

fn step_indicator(current: WizardStep) -> Markup {
    html! {
        ol.steps {
            @for step in WizardStep::ALL {
                @let state = if step == current {
                    "active"
                } else if step < current {
                    "completed"
                } else {
                    "pending"
                };
                li class={ "step " (state) } {
                    span.step-number { (step.number()) }
                    span.step-title { (step.title()) }
                }
            }
        }
    }
}

fn alert(notice: &Notice) -> Markup {
    let (class, message) = match notice {
        Notice::Success(m) => ("alert success", m),
        Notice::Error(m) => ("alert error", m),
    };
    html! {
        div class=(class) role="status" { (message) }
    }
}

fn canvas_errors(errors: &[String]) -> Markup {
    html! {
        div.alert.warning {
            strong { "Some assignments could not be updated:" }
            ul {
                @for e in errors {
                    li { (e) }
                }
            }
        }
    }
}

fn back_button(target: WizardStep, label: &str) -> Markup {
    html! {
        form.inline method="post" action="/" {
            input type="hidden" name="action" value="back_to_step";
            input type="hidden" name="target_step" value=(target.number());
            button.secondary type="submit" { (label) }
        }
    }
}

fn api_setup_step(session: &WizardSession) -> Markup {
    html! {
        div.card {
            h2 { "Step 1: Configure AI" }
            p { "Enter at least one API key. The other provider is used as a fallback when both are set." }
            form method="post" action="/" {
                input type="hidden" name="action" value="setup_api";
                label for="gemini_api_key" { "Gemini API key" }
                input #gemini_api_key type="password" name="gemini_api_key"
                    value=(session.gemini_key) autocomplete="off";
                label for="claude_api_key" { "Claude API key" }
                input #claude_api_key type="password" name="claude_api_key"
                    value=(session.claude_key) autocomplete="off";
                fieldset.providers {
                    legend { "Preferred provider" }
                    @for provider in [AiProvider::Gemini, AiProvider::Claude] {
                        label.radio {
                            input type="radio" name="ai_provider" value=(provider.as_str())
                                checked[session.ai_provider == provider];
                            (provider.display_name())
                        }
                    }
                }
                button.primary type="submit" { "Save and Continue" }
            }
        }
    }
}

fn matching_step(session: &WizardSession) -> Markup {
    html! {
        div.card {
            h2 { "Step 2: Match Assignments" }
            p {
                "Paste your Canvas assignment list. It is matched against the Fall 2025 schedule using "
                (session.ai_provider) "."
            }
            form method="post" action="/" {
                input type="hidden" name="action" value="match_assignments";
                textarea name="assignment_list" rows="10"
                    placeholder="One assignment per line" { (session.assignment_list) }
                div.actions {
                    button.primary type="submit" { "Match with AI" }
                }
            }
            div.actions {
                (back_button(WizardStep::ApiSetup, "Back"))
            }
        }
        @if !session.matches.is_empty() {
            div.card {
                h3 { "Matches (" (session.matches.len()) ")" }
                p.hint { "Adjust any date or time; changes are saved as you edit." }
                (match_table(&session.matches))
                form method="post" action="/" {
                    input type="hidden" name="action" value="proceed_to_canvas";
                    button.primary type="submit" { "Continue to Canvas" }
                }
            }
        }
    }
}

fn match_table(matches: &[AssignmentMatch]) -> Markup {
    html! {
        table.matches {
            thead {
                tr {
                    th { "#" }
                    th { "Assignment" }
                    th { "Due" }
                    th { "Confidence" }
                    th { "Reasoning" }
                }
            }
            tbody {
                @for (i, m) in matches.iter().enumerate() {
                    tr data-index=(i) {
                        td { (i + 1) }
                        td { (m.assignment_name) }
                        td.due {
                            span.due-display { (dates::display(&m.matched_due_date, dates::LONG_WITH_TIME)) }
                            div.due-edit {
                                input.due-date type="date" data-index=(i)
                                    value=(dates::display(&m.matched_due_date, dates::INPUT_DATE));
                                input.due-time type="time" data-index=(i)
                                    value=(dates::display(&m.matched_due_date, dates::INPUT_TIME));
                            }
                        }
                        td { span class={ "badge " (m.confidence.as_str()) } { (m.confidence.label()) } }
                        td.reasoning { (m.reasoning) }
                    }
                }
            }
        }
    }
}

fn canvas_step(session: &WizardSession, canvas_default_url: &str) -> Markup {
    let canvas_url = if session.canvas_url.is_empty() {
        canvas_default_url
    } else {
        session.canvas_url.as_str()
    };

    html! {
        div.card {
            h2 { "Step 3: Update Canvas" }
            p { (session.matches.len()) " assignments will be updated." }
            @if !session.matches.is_empty() {
                ul.summary {
                    @for m in &session.matches {
                        li {
                            strong { (m.assignment_name) }
                            " → " (dates::display(&m.matched_due_date, dates::SHORT))
                            " " (dates::display(&m.matched_due_date, dates::TIME))
                        }
                    }
                }
            }
            form method="post" action="/" {
                input type="hidden" name="action" value="update_canvas";
                label for="canvas_url" { "Canvas API URL" }
                input #canvas_url type="url" name="canvas_url" value=(canvas_url);
                label for="api_token" { "Canvas API token" }
                input #api_token type="password" name="api_token" autocomplete="off";
                label for="course_id" { "Course ID" }
                input #course_id type="text" name="course_id" value=(session.course_id);
                button.primary type="submit" { "Update Canvas" }
            }
            div.actions {
                (back_button(WizardStep::Matching, "Back to Matching"))
            }
        }
    }
}

fn chat_sidebar(session: &WizardSession) -> Markup {
    html! {
        aside.chat {
            h2 { "AI Assistant" }
            @if session.has_any_key() {
                div.chat-log #"chat-log" {
                    div.message.assistant {
                        "Ask me about your schedule, or request suggestions for matching."
                    }
                }
                form #"chat-form" {
                    input #"chat-question" type="text" name="question"
                        placeholder="Ask about due dates..." autocomplete="off";
                    button.primary type="submit" { "Send" }
                }
                button.secondary #"suggest-button" type="button"
                    disabled[session.assignment_list.trim().is_empty()] { "Suggest matches" }
            } @else {
                p.hint { "Configure an API key to chat with the assistant." }
            }
        }
    }
}
