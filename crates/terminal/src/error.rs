//! Workflow errors and Sentry breadcrumbs.
//!
//! Every transition of the workflow returns `Result<T, WorkflowError>`. By
//! the time an error is returned it has already been shown to the clerk on
//! the panel it came from, so callers are free to ignore it.

use store_counter_core::{CartError, CheckoutError, PhoneError};
use thiserror::Error;

use crate::backend::ApiError;
use crate::workflow::WorkflowState;

/// Errors surfaced by workflow transitions.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A local cart precondition failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The checkout hand-off could not be built.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The phone field could not be used.
    #[error("invalid phone: {0}")]
    Phone(#[from] PhoneError),

    /// An action was attempted before the step it depends on.
    #[error("cannot {action} yet: {hint}")]
    OutOfOrder {
        action: &'static str,
        hint: &'static str,
        state: WorkflowState,
    },

    /// No customer is registered for this session.
    #[error("no customer registered")]
    NoCustomer,
}

impl WorkflowError {
    /// Whether the error came from a local quantity bound check.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::Cart(err) if err.is_out_of_range())
    }
}

/// Add a breadcrumb for clerk actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of clerk
/// actions leading up to an error. Without an initialized Sentry client this
/// is a no-op.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("workflow", "Selected product", Some(&[("product_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use store_counter_core::QuantityError;

    use crate::backend::NetworkError;

    #[test]
    fn test_workflow_error_display() {
        let err = WorkflowError::from(ApiError::Backend("Category is required".to_string()));
        assert_eq!(err.to_string(), "Category is required");

        let err = WorkflowError::from(ApiError::Network(NetworkError::Status(502)));
        assert_eq!(err.to_string(), "Network response was not ok (HTTP 502)");

        let err = WorkflowError::from(CartError::NoSelection);
        assert_eq!(err.to_string(), "no product selected");
    }

    #[test]
    fn test_is_out_of_range() {
        let err = WorkflowError::from(CartError::Quantity(QuantityError::OutOfRange {
            quantity: Decimal::new(60, 0),
            max: Decimal::new(50, 0),
        }));
        assert!(err.is_out_of_range());
        assert!(!WorkflowError::NoCustomer.is_out_of_range());
    }

    #[test]
    fn test_breadcrumb_without_client_is_noop() {
        add_breadcrumb("workflow", "test", Some(&[("key", "value")]));
        add_breadcrumb("workflow", "test", None);
    }
}
