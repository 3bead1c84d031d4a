//! Test doubles for the AI providers and Canvas, plus a throwaway HTTP server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use crate::ai::{AiError, Provider, ProviderFactory};
use crate::canvas::{CanvasApi, CanvasError, CourseRef};
use crate::models::{AiProvider, CanvasAssignment};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Canned provider behaviour.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail,
}

#[derive(Default)]
struct ProviderLog {
    calls: HashMap<AiProvider, usize>,
    prompts: Vec<String>,
}

/// Provider factory whose providers answer from a script and count calls.
#[derive(Clone, Default)]
pub struct FakeProviders {
    replies: HashMap<AiProvider, Reply>,
    log: Arc<Mutex<ProviderLog>>,
}

impl FakeProviders {
    pub fn reply(mut self, provider: AiProvider, reply: Reply) -> Self {
        self.replies.insert(provider, reply);
        self
    }

    pub fn calls(&self, provider: AiProvider) -> usize {
        let log = self.log.lock().unwrap();
        log.calls.get(&provider).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.log.lock().unwrap().calls.values().sum()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.log.lock().unwrap().prompts.last().cloned()
    }
}

impl ProviderFactory for FakeProviders {
    fn create(&self, kind: AiProvider, _api_key: &str) -> Box<dyn Provider> {
        Box::new(FakeProvider {
            kind,
            reply: self.replies.get(&kind).cloned().unwrap_or(Reply::Fail),
            log: Arc::clone(&self.log),
        })
    }
}

struct FakeProvider {
    kind: AiProvider,
    reply: Reply,
    log: Arc<Mutex<ProviderLog>>,
}

#[async_trait]
impl Provider for FakeProvider {
    fn kind(&self) -> AiProvider {
        self.kind
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        {
            let mut log = self.log.lock().unwrap();
            *log.calls.entry(self.kind).or_default() += 1;
            log.prompts.push(prompt.to_string());
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(AiError::Upstream {
                provider: self.kind,
                status: 500,
                body: "boom".to_string(),
            }),
        }
    }
}

/// In-memory Canvas course.
#[derive(Clone, Default)]
pub struct FakeCanvas {
    assignments: Arc<Mutex<Vec<CanvasAssignment>>>,
    list_status: Option<u16>,
    update_status: Option<u16>,
}

impl FakeCanvas {
    pub fn with_assignments(names: &[&str]) -> Self {
        let assignments = names
            .iter()
            .zip(1..)
            .map(|(name, id)| CanvasAssignment {
                id,
                name: (*name).to_string(),
                due_at: None,
            })
            .collect();
        Self {
            assignments: Arc::new(Mutex::new(assignments)),
            ..Self::default()
        }
    }

    /// Make every list request fail with `status`.
    pub const fn failing_list(mut self, status: u16) -> Self {
        self.list_status = Some(status);
        self
    }

    /// Make every update request fail with `status`.
    pub const fn failing_updates(mut self, status: u16) -> Self {
        self.update_status = Some(status);
        self
    }

    pub fn due_at(&self, name: &str) -> Option<String> {
        self.assignments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.due_at.clone())
    }
}

#[async_trait]
impl CanvasApi for FakeCanvas {
    async fn list_assignments(
        &self,
        _course: &CourseRef,
    ) -> Result<Vec<CanvasAssignment>, CanvasError> {
        if let Some(status) = self.list_status {
            return Err(CanvasError::Status { status });
        }
        Ok(self.assignments.lock().unwrap().clone())
    }

    async fn update_due_date(
        &self,
        _course: &CourseRef,
        assignment_id: u64,
        due_at: &str,
    ) -> Result<(), CanvasError> {
        if let Some(status) = self.update_status {
            return Err(CanvasError::Status { status });
        }
        let mut assignments = self.assignments.lock().unwrap();
        let assignment = assignments
            .iter_mut()
            .find(|a| a.id == assignment_id)
            .ok_or(CanvasError::Status { status: 404 })?;
        assignment.due_at = Some(due_at.to_string());
        Ok(())
    }
}
