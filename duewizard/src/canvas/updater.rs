//! Pushes matched due dates to Canvas, one assignment at a time.

use tracing::{info, warn};

use super::client::{CanvasApi, CanvasError, CourseRef};
use crate::models::{AssignmentMatch, CanvasAssignment};

/// Outcome of an update run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Assignments whose due date was changed.
    pub updated: usize,
    /// One message per assignment that could not be updated.
    pub errors: Vec<String>,
}

/// Whether either name contains the other, ignoring case.
fn names_overlap(canvas_name: &str, wanted: &str) -> bool {
    let canvas_name = canvas_name.to_lowercase();
    let wanted = wanted.to_lowercase();
    canvas_name.contains(&wanted) || wanted.contains(&canvas_name)
}

/// Resolve an assignment name to a Canvas id.
///
/// Uses a case-insensitive substring test in both directions and takes the
/// first hit in list order. When several assignments overlap the name (for
/// example "Quiz 1" and "Quiz 10"), whichever Canvas lists first wins. Blank
/// names never match.
pub fn find_assignment_id(assignments: &[CanvasAssignment], name: &str) -> Option<u64> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    assignments
        .iter()
        .filter(|a| !a.name.trim().is_empty())
        .find(|a| names_overlap(&a.name, name))
        .map(|a| a.id)
}

/// Update every match's due date. Failures are collected, never fatal.
pub async fn update_assignments(
    api: &dyn CanvasApi,
    course: &CourseRef,
    matches: &[AssignmentMatch],
) -> UpdateReport {
    let mut report = UpdateReport::default();

    for m in matches {
        let name = &m.assignment_name;

        let assignments = match api.list_assignments(course).await {
            Ok(list) => list,
            Err(CanvasError::Status { status }) => {
                report
                    .errors
                    .push(format!("Failed to fetch assignments: HTTP {status}"));
                continue;
            }
            Err(e) => {
                report.errors.push(format!("Error updating {name}: {e}"));
                continue;
            }
        };

        let Some(assignment_id) = find_assignment_id(&assignments, name) else {
            warn!(assignment = %name, "no canvas assignment matches");
            report.errors.push(format!("Assignment not found: {name}"));
            continue;
        };

        match api
            .update_due_date(course, assignment_id, &m.matched_due_date)
            .await
        {
            Ok(()) => {
                info!(assignment = %name, assignment_id, due_at = %m.matched_due_date, "due date updated");
                report.updated += 1;
            }
            Err(CanvasError::Status { status }) => {
                report
                    .errors
                    .push(format!("Failed to update {name}: HTTP {status}"));
            }
            Err(e) => {
                report.errors.push(format!("Error updating {name}: {e}"));
            }
        }
    }

    info!(
        course_id = course.course_id(),
        updated = report.updated,
        failed = report.errors.len(),
        "canvas update finished"
    );
    report
}
