//! reqwest implementation of [`Backend`].

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use store_counter_core::{Customer, Phone, Product, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::wire::{
    self, ProductRequest, ProductResponse, ProductsRequest, ProductsResponse, RegisterRequest,
    RegisterResponse, paths,
};
use super::{ApiError, Backend, NetworkError};
use crate::config::TerminalConfig;

/// Backend client speaking JSON over HTTP.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

struct HttpBackendInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

/// Why a POST did not produce the expected body.
enum PostError {
    Network(NetworkError),
    /// The backend answered with a structured `{error}` body.
    Rejected { status: StatusCode, message: String },
}

impl From<NetworkError> for PostError {
    fn from(err: NetworkError) -> Self {
        Self::Network(err)
    }
}

impl HttpBackend {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &TerminalConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(NetworkError::Transport)?;

        Ok(Self {
            inner: Arc::new(HttpBackendInner {
                client,
                base_url: config.backend_url.clone(),
                token: config.backend_token.clone(),
            }),
        })
    }

    /// The base URL endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, PostError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

        let mut request = self.inner.client.post(url).json(body);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(NetworkError::Transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(NetworkError::Transport)?;
        debug!(%status, len = bytes.len(), "backend responded");

        let value = serde_json::from_slice::<serde_json::Value>(&bytes).ok();

        // A structured error wins over the status: some endpoints send
        // `{error}` with 2xx, others with 4xx/5xx.
        if let Some(message) = value.as_ref().and_then(wire::error_message) {
            return Err(PostError::Rejected { status, message });
        }

        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()).into());
        }

        let value =
            value.ok_or_else(|| NetworkError::Decode("response body is not JSON".to_string()))?;
        serde_json::from_value(value).map_err(|e| NetworkError::Decode(e.to_string()).into())
    }
}

impl Backend for HttpBackend {
    #[instrument(skip(self))]
    async fn list_products(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        let response: ProductsResponse = self
            .post(paths::PRODUCTS, &ProductsRequest { category })
            .await
            .map_err(|err| match err {
                PostError::Network(e) => ApiError::Network(e),
                PostError::Rejected { message, .. } => ApiError::Backend(message),
            })?;

        Ok(response.products)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let response: ProductResponse = self
            .post(paths::PRODUCT, &ProductRequest { product_id })
            .await
            .map_err(|err| match err {
                PostError::Network(e) => ApiError::Network(e),
                PostError::Rejected { status, message } if status == StatusCode::NOT_FOUND => {
                    ApiError::NotFound(message)
                }
                PostError::Rejected { message, .. } => ApiError::Backend(message),
            })?;

        response
            .product
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
    }

    #[instrument(skip(self, phone))]
    async fn register_customer(&self, name: &str, phone: &Phone) -> Result<Customer, ApiError> {
        let response: RegisterResponse = self
            .post(
                paths::REGISTER,
                &RegisterRequest {
                    name,
                    phone: phone.as_str(),
                },
            )
            .await
            .map_err(|err| match err {
                PostError::Network(e) => ApiError::Network(e),
                PostError::Rejected { message, .. } => ApiError::Validation(message),
            })?;

        Ok(Customer::new(response.user_id, name, phone.clone()))
    }
}
