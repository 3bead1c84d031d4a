//! Wizard state machine.
//!
//! A request opens a [`RequestContext`] (session id + loaded session), applies
//! one action or AJAX call to it, renders, and closes it, which saves the
//! session back to the store.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::WizardError;
use super::form::{Action, AjaxRequest};
use super::view::{self, Page};
use crate::ai::{AiGateway, ChatContext, ProviderFactory, ProviderKeys};
use crate::canvas::{self, CanvasApi, CourseRef};
use crate::dates;
use crate::models::{WizardSession, WizardStep};
use crate::schedule::fall_2025_schedule;
use crate::session::SessionStore;

/// One-shot message shown above the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Per-request state threaded through the controller.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session_id: String,
    pub session: WizardSession,
    pub notice: Option<Notice>,
    /// Whether the store already holds this session.
    pub stored: bool,
}

/// JSON body for AJAX calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AjaxResponse {
    Done { success: bool },
    Reply { response: String },
    Failed { error: String },
}

impl AjaxResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Failed {
            error: message.into(),
        }
    }
}

fn new_session_id() -> String {
    Uuid::now_v7().to_string()
}

/// Drives the wizard against its collaborators.
pub struct Wizard {
    sessions: Arc<dyn SessionStore>,
    providers: Arc<dyn ProviderFactory>,
    canvas: Arc<dyn CanvasApi>,
    canvas_default_url: String,
}

impl Wizard {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        providers: Arc<dyn ProviderFactory>,
        canvas: Arc<dyn CanvasApi>,
        canvas_default_url: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            providers,
            canvas,
            canvas_default_url: canvas_default_url.into(),
        }
    }

    /// Load the session for `session_id`, or start a fresh one.
    ///
    /// Unknown ids and unreadable sessions both start over at step 1.
    pub async fn open(&self, session_id: Option<&str>) -> RequestContext {
        if let Some(id) = session_id {
            match self.sessions.load(id).await {
                Ok(Some(session)) => {
                    return RequestContext {
                        session_id: id.to_string(),
                        session,
                        notice: None,
                        stored: true,
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "discarding unreadable session"),
            }
        }
        RequestContext {
            session_id: new_session_id(),
            session: WizardSession::default(),
            notice: None,
            stored: false,
        }
    }

    /// Persist the session at the end of a request.
    ///
    /// A new session nobody has touched is not written. Returns whether the
    /// session is now in the store.
    pub async fn close(&self, ctx: &RequestContext) -> Result<bool, WizardError> {
        if !ctx.stored && ctx.session == WizardSession::default() {
            return Ok(false);
        }
        self.sessions.save(&ctx.session_id, &ctx.session).await?;
        Ok(true)
    }

    /// Apply a full-page action, recording the outcome as the notice.
    ///
    /// On failure the step stays where it was, except that a failed match
    /// always lands on step 2.
    pub async fn perform(&self, ctx: &mut RequestContext, action: Action) {
        let name = action.name();
        let step_before = ctx.session.current_step;
        let is_match = matches!(action, Action::MatchAssignments { .. });

        match self.apply(ctx, action).await {
            Ok(message) => {
                info!(action = name, step = %ctx.session.current_step, "wizard action succeeded");
                ctx.notice = message.map(Notice::Success);
            }
            Err(e) => {
                warn!(action = name, error = %e, "wizard action failed");
                ctx.session.current_step = if is_match {
                    WizardStep::Matching
                } else {
                    step_before
                };
                ctx.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    /// Record a form that could not be parsed into an action.
    pub fn reject(ctx: &mut RequestContext, error: &WizardError) {
        warn!(error = %error, "rejected wizard form");
        ctx.notice = Some(Notice::Error(error.to_string()));
    }

    async fn apply(
        &self,
        ctx: &mut RequestContext,
        action: Action,
    ) -> Result<Option<String>, WizardError> {
        match action {
            Action::SetupApi {
                gemini_key,
                claude_key,
                provider,
            } => {
                let session = &mut ctx.session;
                session.gemini_key = gemini_key;
                session.claude_key = claude_key;
                session.ai_provider = provider;
                if !session.has_any_key() {
                    return Err(WizardError::validation(
                        "Please provide at least one API key",
                    ));
                }
                session.current_step = WizardStep::Matching;
                Ok(Some("API keys configured successfully!".to_string()))
            }

            Action::MatchAssignments { assignment_list } => {
                ctx.session.assignment_list = assignment_list;
                self.match_assignments(&mut ctx.session).await.map(Some)
            }

            Action::ProceedToCanvas => {
                if ctx.session.matches.is_empty() {
                    return Err(WizardError::validation(
                        "No matches available. Please complete the matching step first.",
                    ));
                }
                ctx.session.current_step = WizardStep::CanvasUpdate;
                Ok(None)
            }

            Action::UpdateCanvas {
                canvas_url,
                api_token,
                course_id,
            } => {
                ctx.session.canvas_url.clone_from(&canvas_url);
                ctx.session.course_id.clone_from(&course_id);
                if canvas_url.is_empty() || api_token.is_empty() || course_id.is_empty() {
                    return Err(WizardError::validation(
                        "Please provide Canvas URL, API token, and Course ID",
                    ));
                }

                let course = CourseRef::new(&canvas_url, &api_token, &course_id);
                let report =
                    canvas::update_assignments(self.canvas.as_ref(), &course, &ctx.session.matches)
                        .await;
                ctx.session.canvas_errors = report.errors;
                ctx.session.current_step = WizardStep::CanvasUpdate;
                Ok(Some(format!(
                    "Canvas update completed! Updated {} assignments successfully.",
                    report.updated
                )))
            }

            Action::Reset => {
                self.sessions.remove(&ctx.session_id).await?;
                ctx.session_id = new_session_id();
                ctx.session = WizardSession::default();
                ctx.stored = false;
                Ok(Some("Wizard reset. Starting fresh!".to_string()))
            }

            Action::BackToStep { target } => {
                let step = WizardStep::parse(&target).ok_or_else(|| {
                    WizardError::validation(format!("Unknown wizard step '{}'", target.trim()))
                })?;
                ctx.session.current_step = step;
                Ok(Some(format!("Moved back to step {step}")))
            }
        }
    }

    async fn match_assignments(&self, session: &mut WizardSession) -> Result<String, WizardError> {
        if session.assignment_list.trim().is_empty() {
            return Err(WizardError::validation(
                "Please paste your Canvas assignment list",
            ));
        }
        if !session.has_any_key() {
            return Err(WizardError::Configuration(
                "No AI API keys configured. Please go back to Step 1.".to_string(),
            ));
        }

        let schedule = fall_2025_schedule();
        session.due_dates = schedule.to_string();

        let gateway =
            AiGateway::for_keys(self.providers.as_ref(), &ProviderKeys::from_session(session))?;
        let matches = gateway
            .match_assignments(&session.assignment_list, schedule)
            .await?;

        let count = matches.len();
        session.matches = matches;
        session.current_step = WizardStep::Matching;
        Ok(format!(
            "Fall 2025 schedule generated! {count} assignments matched with dates."
        ))
    }

    /// Answer an AJAX call. Never fails; errors come back as `{"error": ...}`.
    pub async fn ajax(&self, ctx: &mut RequestContext, request: AjaxRequest) -> AjaxResponse {
        let name = request.name();
        let response = match request {
            AjaxRequest::UpdateDate { index, date } => Self::update_date(ctx, &index, &date),
            AjaxRequest::Chat { question } => self.chat(ctx, &question).await,
            AjaxRequest::Suggest => self.suggest(ctx).await,
        };
        if let AjaxResponse::Failed { error } = &response {
            warn!(request = name, error = %error, "ajax request failed");
        }
        response
    }

    fn update_date(ctx: &mut RequestContext, index: &str, date: &str) -> AjaxResponse {
        let slot = index
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < ctx.session.matches.len());
        let date = date.trim();
        let (Some(i), false) = (slot, date.is_empty()) else {
            return AjaxResponse::error("Invalid parameters");
        };
        let Some(normalized) = dates::normalize(date) else {
            return AjaxResponse::error(format!("Invalid date: {date}"));
        };

        info!(index = i, due = %normalized, "due date edited");
        ctx.session.matches[i].matched_due_date = normalized;
        AjaxResponse::Done { success: true }
    }

    async fn chat(&self, ctx: &RequestContext, question: &str) -> AjaxResponse {
        let question = question.trim();
        if question.is_empty() {
            return AjaxResponse::error("Please enter a question");
        }
        let session = &ctx.session;
        let gateway =
            match AiGateway::for_keys(self.providers.as_ref(), &ProviderKeys::from_session(session))
            {
                Ok(g) => g,
                Err(e) => return AjaxResponse::error(e.to_string()),
            };
        let context = ChatContext {
            assignment_list: &session.assignment_list,
            schedule: &session.due_dates,
            matches: &session.matches,
        };
        match gateway.chat(question, &context).await {
            Ok(response) => AjaxResponse::Reply { response },
            Err(e) => AjaxResponse::error(e.to_string()),
        }
    }

    async fn suggest(&self, ctx: &RequestContext) -> AjaxResponse {
        let session = &ctx.session;
        if session.assignment_list.trim().is_empty() {
            return AjaxResponse::error("Paste your Canvas assignment list first");
        }
        let schedule = if session.due_dates.is_empty() {
            fall_2025_schedule()
        } else {
            session.due_dates.as_str()
        };
        let gateway =
            match AiGateway::for_keys(self.providers.as_ref(), &ProviderKeys::from_session(session))
            {
                Ok(g) => g,
                Err(e) => return AjaxResponse::error(e.to_string()),
            };
        match gateway.suggest(&session.assignment_list, schedule).await {
            Ok(response) => AjaxResponse::Reply { response },
            Err(e) => AjaxResponse::error(e.to_string()),
        }
    }

    /// Render the page for the current step.
    ///
    /// Canvas errors are shown once, so rendering clears them from the session.
    pub fn render(&self, ctx: &mut RequestContext) -> String {
        let html = view::render_page(&Page {
            session: &ctx.session,
            notice: ctx.notice.as_ref(),
            canvas_default_url: &self.canvas_default_url,
        })
        .into_string();
        ctx.session.canvas_errors.clear();
        html
    }
}
