//! Request and response bodies of the backend endpoints.

use serde::{Deserialize, Serialize};
use store_counter_core::{Product, ProductId, UserId};

/// Endpoint paths, relative to the backend base URL.
pub mod paths {
    pub const PRODUCTS: &str = "api/products";
    pub const PRODUCT: &str = "api/product";
    pub const REGISTER: &str = "api/register";
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductsRequest<'a> {
    pub category: &'a str,
}

/// A missing `products` field reads as an empty category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProductRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub phone: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

/// Extract a non-empty `error` message from a response body.
#[must_use]
pub fn error_message(body: &serde_json::Value) -> Option<String> {
    body.get("error")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}
