//! Backend calls the counter depends on.
//!
//! # Endpoints
//!
//! All requests are JSON `POST`s:
//!
//! - `/api/products` - list a category (Catalog Client)
//! - `/api/product` - full detail for one product (Product Detail Resolver)
//! - `/api/register` - register or identify a customer (Customer Registrar)
//!
//! A response is a failure when the HTTP status is not 2xx OR when the body
//! carries an `error` field, whatever the status. Both paths end up as an
//! [`ApiError`].
//!
//! The [`Backend`] trait is the seam the workflow controller is generic
//! over; [`HttpBackend`] is the reqwest implementation.

use std::future::Future;

use store_counter_core::{Customer, Phone, Product, ProductId};
use thiserror::Error;

mod http;
pub mod wire;

pub use http::HttpBackend;

/// Transport-level failures: the backend could not be reached or did not
/// answer in the expected shape.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status without a structured error body.
    #[error("Network response was not ok (HTTP {0})")]
    Status(u16),

    /// Body was not the JSON the endpoint promises.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Endpoint URL could not be built from the configured base.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// Errors returned by backend-facing operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend could not be reached or answered unexpectedly.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The backend reported an application-level error.
    #[error("{0}")]
    Backend(String),

    /// The backend rejected the submitted data.
    #[error("{0}")]
    Validation(String),

    /// The backend reported that the resource does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// Whether the failure happened below the application layer.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Operations the order-composition workflow needs from the backend.
pub trait Backend {
    /// List the products of one category. An empty list is a success.
    fn list_products(
        &self,
        category: &str,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Fetch the full detail of one product.
    fn get_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// Register a customer, or get back the id the backend already has for
    /// this (name, phone) pair.
    fn register_customer(
        &self,
        name: &str,
        phone: &Phone,
    ) -> impl Future<Output = Result<Customer, ApiError>> + Send;
}
