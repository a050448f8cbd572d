//! Integration tests for Store Counter.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p store-counter-integration-tests
//! ```
//!
//! Each test spawns a [`StubServer`]: an in-process axum app on an ephemeral
//! port that speaks the backend's JSON contract. No external services are
//! needed.
//!
//! ```rust,ignore
//! let server = StubServer::builder().with_product("Vegetables", tomato()).spawn().await;
//! let backend = server.backend();
//! let products = backend.list_products("Vegetables").await.unwrap();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use store_counter_core::{Product, ProductId, QuantityPolicy, Unit};
use store_counter_terminal::presenter::ProductDetailView;
use store_counter_terminal::{
    Container, HttpBackend, ListContent, Panel, Presenter, Severity, TerminalConfig,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Token the stub accepts when auth is enabled.
pub const TEST_TOKEN: &str = "Zq8#mP2$vL9@wK4!";

/// Endpoint paths as served by the stub.
pub mod endpoints {
    pub const PRODUCTS: &str = "/api/products";
    pub const PRODUCT: &str = "/api/product";
    pub const REGISTER: &str = "/api/register";
}

// =============================================================================
// Fixtures
// =============================================================================

#[must_use]
pub fn product(id: i64, name: &str, price: Decimal, unit: Unit, stock: Decimal) -> Product {
    Product {
        product_id: ProductId::new(id),
        name: name.to_string(),
        price,
        unit,
        stock_quantity: stock,
    }
}

#[must_use]
pub fn tomato() -> Product {
    product(1, "Tomato", Decimal::new(30, 0), Unit::Kg, Decimal::new(50, 0))
}

#[must_use]
pub fn onion() -> Product {
    product(2, "Onion", Decimal::new(40, 0), Unit::Kg, Decimal::new(20, 0))
}

#[must_use]
pub fn milk() -> Product {
    product(3, "Milk", Decimal::new(25, 0), Unit::Unit, Decimal::new(10, 0))
}

// =============================================================================
// Stub backend
// =============================================================================

/// A canned failure for one endpoint.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Reply with this status and an empty body.
    Status(u16),
    /// Reply with `{"error": message}` and this status, 2xx included.
    ErrorBody { status: u16, message: String },
}

#[derive(Debug, Default)]
struct StubData {
    catalog: Vec<(String, Product)>,
    registrations: Vec<(String, String)>,
    failures: HashMap<&'static str, Failure>,
    hits: HashMap<&'static str, usize>,
    token: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct StubState {
    data: Arc<Mutex<StubData>>,
}

impl StubState {
    fn lock(&self) -> MutexGuard<'_, StubData> {
        self.data.lock().expect("stub state poisoned")
    }

    /// Common request handling: count the hit, check auth, apply failures.
    fn gate(&self, path: &'static str, headers: &HeaderMap) -> Option<Response> {
        let mut data = self.lock();
        *data.hits.entry(path).or_default() += 1;

        if let Some(token) = &data.token {
            let expected = format!("Bearer {token}");
            let authorized = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == expected);
            if !authorized {
                return Some(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"));
            }
        }

        data.failures.get(path).map(|failure| match failure {
            Failure::Status(status) => status_code(*status).into_response(),
            Failure::ErrorBody { status, message } => error_response(status_code(*status), message),
        })
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("valid status code")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn list_products(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(response) = state.gate(endpoints::PRODUCTS, &headers) {
        return response;
    }

    let category = body["category"].as_str().map(str::trim).unwrap_or_default();
    if category.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Category is required");
    }

    let products: Vec<Product> = state
        .lock()
        .catalog
        .iter()
        .filter(|(c, _)| c == category)
        .map(|(_, p)| p.clone())
        .collect();
    Json(json!({ "products": products })).into_response()
}

async fn get_product(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(response) = state.gate(endpoints::PRODUCT, &headers) {
        return response;
    }

    let Some(product_id) = body["product_id"].as_i64().map(ProductId::new) else {
        return error_response(StatusCode::BAD_REQUEST, "Product ID is required");
    };

    let found = state
        .lock()
        .catalog
        .iter()
        .find(|(_, p)| p.product_id == product_id)
        .map(|(_, p)| p.clone());
    match found {
        Some(product) => Json(json!({ "product": product })).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn register(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(response) = state.gate(endpoints::REGISTER, &headers) {
        return response;
    }

    let name = body["name"].as_str().map(str::trim).unwrap_or_default();
    let phone = body["phone"].as_str().map(str::trim).unwrap_or_default();
    if name.is_empty() || phone.is_empty() {
        // The real backend reports validation failures with a 200.
        return error_response(StatusCode::OK, "Name and phone are required");
    }

    let key = (name.to_string(), phone.to_string());
    let mut data = state.lock();
    let index = match data.registrations.iter().position(|k| *k == key) {
        Some(index) => index,
        None => {
            data.registrations.push(key);
            data.registrations.len() - 1
        }
    };
    let user_id = 1 + i64::try_from(index).expect("registration count fits i64");
    Json(json!({ "user_id": user_id })).into_response()
}

/// Builder for a [`StubServer`].
#[derive(Debug, Default)]
pub struct StubServerBuilder {
    data: StubData,
}

impl StubServerBuilder {
    /// Add a product to a category.
    #[must_use]
    pub fn with_product(mut self, category: &str, product: Product) -> Self {
        self.data.catalog.push((category.to_string(), product));
        self
    }

    /// Seed the usual Vegetables and Dairy categories.
    #[must_use]
    pub fn with_default_catalog(self) -> Self {
        self.with_product("Vegetables", tomato())
            .with_product("Vegetables", onion())
            .with_product("Dairy", milk())
    }

    /// Require [`TEST_TOKEN`] as a bearer token.
    #[must_use]
    pub fn with_auth(mut self) -> Self {
        self.data.token = Some(TEST_TOKEN.to_string());
        self
    }

    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(self) -> StubServer {
        let state = StubState {
            data: Arc::new(Mutex::new(self.data)),
        };

        let app = Router::new()
            .route(endpoints::PRODUCTS, post(list_products))
            .route(endpoints::PRODUCT, post(get_product))
            .route(endpoints::REGISTER, post(register))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        StubServer {
            url: format!("http://{addr}"),
            state,
            handle,
        }
    }
}

/// An in-process backend speaking the counter's JSON contract.
///
/// The server stops when dropped.
pub struct StubServer {
    url: String,
    state: StubState,
    handle: JoinHandle<()>,
}

impl StubServer {
    #[must_use]
    pub fn builder() -> StubServerBuilder {
        StubServerBuilder::default()
    }

    /// Base URL, without a trailing slash.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Terminal configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected.
    #[must_use]
    pub fn config(&self) -> TerminalConfig {
        let url = self.url.clone();
        let token = self.state.lock().token.clone();
        TerminalConfig::from_lookup(|key| match key {
            "POS_BACKEND_URL" => Some(url.clone()),
            "POS_BACKEND_TOKEN" => token.clone(),
            _ => None,
        })
        .expect("stub config")
    }

    /// An HTTP backend client for this server.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn backend(&self) -> HttpBackend {
        HttpBackend::new(&self.config()).expect("stub backend client")
    }

    /// Make every request to `path` fail until [`Self::clear_failures`].
    pub fn fail(&self, path: &'static str, failure: Failure) {
        self.state.lock().failures.insert(path, failure);
    }

    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// How many requests reached `path`.
    #[must_use]
    pub fn hits(&self, path: &'static str) -> usize {
        self.state.lock().hits.get(path).copied().unwrap_or_default()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Recording presenter
// =============================================================================

/// One presenter call.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Render(Container, ListContent),
    Status(Panel, String, Severity),
    QuantityPolicy(QuantityPolicy),
    ShowDetail(ProductDetailView),
    HideDetail,
}

/// Presenter that records every call.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    /// Drain the recorded events.
    pub fn take(&mut self) -> Vec<PresenterEvent> {
        std::mem::take(&mut self.events)
    }

    /// Status messages shown on `panel`, oldest first.
    #[must_use]
    pub fn statuses(&self, panel: Panel) -> Vec<(&str, Severity)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Status(p, message, severity) if *p == panel => {
                    Some((message.as_str(), *severity))
                }
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn render_list(&mut self, container: Container, content: ListContent) {
        self.events.push(PresenterEvent::Render(container, content));
    }

    fn show_status(&mut self, panel: Panel, message: &str, severity: Severity) {
        self.events
            .push(PresenterEvent::Status(panel, message.to_string(), severity));
    }

    fn set_quantity_input_policy(&mut self, policy: &QuantityPolicy) {
        self.events.push(PresenterEvent::QuantityPolicy(*policy));
    }

    fn show_product_detail(&mut self, detail: &ProductDetailView) {
        self.events.push(PresenterEvent::ShowDetail(detail.clone()));
    }

    fn hide_product_detail(&mut self) {
        self.events.push(PresenterEvent::HideDetail);
    }
}
