//! Canvas LMS REST integration.

mod client;
mod updater;

pub use client::{CanvasApi, CanvasClient, CanvasError, CourseRef};
pub use updater::update_assignments;
