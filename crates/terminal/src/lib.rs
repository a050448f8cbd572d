//! Store Counter Terminal library.
//!
//! Everything the counter does between "a customer walks in" and "hand the
//! cart to checkout": the backend client, the presenter interface the UI
//! implements, and the workflow controller that drives both.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven terminal configuration
//! - [`backend`] - Catalog, product detail and registration calls
//! - [`presenter`] - Outbound UI collaborator and its view models
//! - [`workflow`] - Order-composition state machine
//! - [`error`] - Workflow error type and Sentry breadcrumbs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod presenter;
pub mod workflow;

pub use backend::{ApiError, Backend, HttpBackend, NetworkError};
pub use config::{ConfigError, TerminalConfig};
pub use error::WorkflowError;
pub use presenter::{Container, ListContent, Panel, Presenter, Severity};
pub use workflow::{ProductResolution, RequestTag, Session, WorkflowController, WorkflowState};
