//! The three-step wizard: form actions, AJAX side channels and page rendering.

mod controller;
mod error;
mod form;
mod view;

pub use controller::{AjaxResponse, RequestContext, Wizard};
pub use form::{Action, AjaxRequest, WizardForm};
