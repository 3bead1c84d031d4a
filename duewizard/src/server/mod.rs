//! Wizard HTTP server.
//!
//! Endpoints:
//! - GET / - Render the current wizard step
//! - POST / - Form action (HTML response) or `ajax` side channel (JSON response)
//!
//! Sessions are identified by the `duewizard_session` cookie.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::ai::HttpProviders;
use crate::canvas::CanvasClient;
use crate::config::{ServerConfig, SessionBackend};
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};
use crate::wizard::{Action, AjaxRequest, AjaxResponse, RequestContext, Wizard, WizardForm};

pub const SESSION_COOKIE: &str = "duewizard_session";

/// How often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Shared server state.
pub struct ServerState {
    wizard: Wizard,
}

pub fn router(wizard: Wizard) -> Router {
    let state = Arc::new(ServerState { wizard });
    Router::new()
        .route("/", get(show_step).post(submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and run until Ctrl-C.
pub async fn start_server(config: ServerConfig, open_browser: bool) -> Result<()> {
    let sessions: Arc<dyn SessionStore> = match &config.sessions {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::File(dir) => {
            let store = FileSessionStore::open(dir)
                .await
                .with_context(|| format!("Failed to open session directory {}", dir.display()))?;
            info!(dir = %store.dir().display(), "persisting sessions to disk");
            Arc::new(store)
        }
    };

    let sweeper = spawn_session_sweeper(sessions.clone(), config.session_idle);

    let client = reqwest::Client::builder()
        .user_agent(concat!("duewizard/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    let wizard = Wizard::new(
        sessions,
        Arc::new(HttpProviders::new(client.clone(), config.providers.clone())),
        Arc::new(CanvasClient::new(client)),
        config.canvas_default_url.clone(),
    );

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let url = config.url();
    info!(%addr, "wizard listening");
    println!("Canvas due date wizard running at {url}");

    if open_browser {
        if let Err(e) = open::that(&url) {
            error!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, router(wizard))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();
    info!("wizard stopped");
    Ok(())
}

/// Periodically drop sessions idle for longer than `max_idle`.
fn spawn_session_sweeper(
    sessions: Arc<dyn SessionStore>,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match sessions.purge_idle(max_idle).await {
                Ok(0) => debug!("no idle sessions"),
                Ok(removed) => info!(removed, "purged idle sessions"),
                Err(e) => warn!(error = %e, "session sweep failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C");
    }
}

// === Handlers ===

async fn show_step(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    let wizard = &state.wizard;
    let mut ctx = wizard.open(session_cookie(&headers).as_deref()).await;
    let html = wizard.render(&mut ctx);
    finish(wizard, &ctx, Html(html)).await
}

async fn submit(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Form(form): Form<WizardForm>,
) -> Response {
    let wizard = &state.wizard;
    let mut ctx = wizard.open(session_cookie(&headers).as_deref()).await;

    if let Some(request) = AjaxRequest::from_form(&form) {
        let response = match request {
            Ok(request) => wizard.ajax(&mut ctx, request).await,
            Err(e) => AjaxResponse::error(e.to_string()),
        };
        return finish(wizard, &ctx, Json(response)).await;
    }

    match Action::from_form(form) {
        Ok(action) => wizard.perform(&mut ctx, action).await,
        Err(e) => Wizard::reject(&mut ctx, &e),
    }
    let html = wizard.render(&mut ctx);
    finish(wizard, &ctx, Html(html)).await
}

/// Save the session and, once it is stored, attach its cookie to `body`.
async fn finish(wizard: &Wizard, ctx: &RequestContext, body: impl IntoResponse) -> Response {
    let stored = match wizard.close(ctx).await {
        Ok(stored) => stored,
        Err(e) => {
            error!(error = %e, "failed to save session");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Could not save your session")
                .into_response();
        }
    };
    match session_cookie_header(&ctx.session_id).filter(|_| stored) {
        Some(cookie) => ([(header::SET_COOKIE, cookie)], body).into_response(),
        None => body.into_response(),
    }
}

/// The session id from the request cookie, if it is a well-formed UUID.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|id| id.to_string())
}

fn session_cookie_header(session_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}
