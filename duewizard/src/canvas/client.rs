//! HTTP client for the Canvas assignments endpoints.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::CanvasAssignment;

/// Canvas returns 10 assignments per page unless asked for more.
const PAGE_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}")]
    Status { status: u16 },
}

/// Which Canvas instance and course to talk to.
#[derive(Debug, Clone)]
pub struct CourseRef {
    base_url: String,
    token: String,
    course_id: String,
}

impl CourseRef {
    /// `base_url` is the API root, e.g. `https://school.instructure.com/api/v1`.
    pub fn new(base_url: &str, token: &str, course_id: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            course_id: course_id.trim().to_string(),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    fn assignments_url(&self) -> String {
        format!(
            "{}/courses/{}/assignments",
            self.base_url,
            urlencoding::encode(&self.course_id)
        )
    }

    fn assignment_url(&self, assignment_id: u64) -> String {
        format!("{}/{assignment_id}", self.assignments_url())
    }
}

/// Canvas operations the updater needs.
#[async_trait]
pub trait CanvasApi: Send + Sync {
    async fn list_assignments(&self, course: &CourseRef)
        -> Result<Vec<CanvasAssignment>, CanvasError>;

    async fn update_due_date(
        &self,
        course: &CourseRef,
        assignment_id: u64,
        due_at: &str,
    ) -> Result<(), CanvasError>;
}

#[derive(Serialize)]
struct AssignmentUpdate<'a> {
    assignment: DueAt<'a>,
}

#[derive(Serialize)]
struct DueAt<'a> {
    due_at: &'a str,
}

/// Canvas REST client authenticating with a bearer token.
#[derive(Debug, Clone, Default)]
pub struct CanvasClient {
    client: reqwest::Client,
}

impl CanvasClient {
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CanvasApi for CanvasClient {
    async fn list_assignments(
        &self,
        course: &CourseRef,
    ) -> Result<Vec<CanvasAssignment>, CanvasError> {
        let url = course.assignments_url();
        debug!(url = %url, "listing canvas assignments");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&course.token)
            .query(&[("per_page", PAGE_SIZE)])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CanvasError::Status {
                status: status.as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    async fn update_due_date(
        &self,
        course: &CourseRef,
        assignment_id: u64,
        due_at: &str,
    ) -> Result<(), CanvasError> {
        let url = course.assignment_url(assignment_id);
        debug!(url = %url, due_at, "updating canvas due date");

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&course.token)
            .json(&AssignmentUpdate {
                assignment: DueAt { due_at },
            })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CanvasError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
