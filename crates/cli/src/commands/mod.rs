//! Subcommand implementations.

pub mod catalog;
pub mod register;
pub mod session;

use store_counter_core::PhoneError;
use store_counter_terminal::{ApiError, ConfigError};
use thiserror::Error;

/// Errors that end a command.
///
/// Workflow failures inside an interactive session are shown to the clerk
/// and do not end the session, so they are not listed here.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid phone: {0}")]
    Phone(#[from] PhoneError),

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode checkout request: {0}")]
    Json(#[from] serde_json::Error),
}
