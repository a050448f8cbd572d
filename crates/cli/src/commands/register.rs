//! One-shot customer registration.
//!
//! # Usage
//!
//! ```bash
//! pos-cli register --name "Asha" --phone 9876543210
//! ```
//!
//! Registration is idempotent on the backend: the same name and phone
//! return the same customer ID.

use store_counter_core::Phone;
use store_counter_terminal::{Backend, HttpBackend, Panel, Presenter, Severity};

use super::CommandError;
use crate::console::ConsolePresenter;

/// Register (or look up) a customer and print their ID.
///
/// # Errors
///
/// Returns an error if the phone is unusable or the backend rejects the
/// registration.
pub async fn run(backend: &HttpBackend, name: &str, phone: &str) -> Result<(), CommandError> {
    let phone = Phone::parse(phone)?;
    let customer = backend.register_customer(name.trim(), &phone).await?;
    tracing::info!(user_id = %customer.user_id, "Customer registered");

    ConsolePresenter::stdout().show_status(
        Panel::Customer,
        &format!("Customer registered (ID: {})", customer.user_id),
        Severity::Success,
    );
    Ok(())
}
