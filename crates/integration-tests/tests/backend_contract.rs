//! Integration tests for the HTTP backend client.
//!
//! These run the reqwest client against the in-process stub and check how
//! each response shape maps onto `ApiError`.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use store_counter_core::{Phone, ProductId, Unit, UserId};
use store_counter_integration_tests::{Failure, StubServer, endpoints, milk, tomato};
use store_counter_terminal::{ApiError, Backend, HttpBackend, NetworkError, TerminalConfig};

fn phone(s: &str) -> Phone {
    Phone::parse(s).unwrap()
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_list_products() {
    let server = StubServer::builder().with_default_catalog().spawn().await;
    let backend = server.backend();

    let products = backend.list_products("Vegetables").await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0], tomato());
    assert_eq!(products[0].unit, Unit::Kg);
    assert_eq!(products[0].price, Decimal::new(30, 0));

    let dairy = backend.list_products("Dairy").await.unwrap();
    assert_eq!(dairy, vec![milk()]);
}

#[tokio::test]
async fn test_empty_category_is_success() {
    let server = StubServer::builder().with_default_catalog().spawn().await;

    let products = server.backend().list_products("Bakery").await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_fractional_prices_survive_the_wire() {
    let server = StubServer::builder()
        .with_product(
            "Fruit",
            store_counter_integration_tests::product(
                9,
                "Mango",
                Decimal::new(12050, 2),
                Unit::Kg,
                Decimal::new(125, 1),
            ),
        )
        .spawn()
        .await;

    let products = server.backend().list_products("Fruit").await.unwrap();
    assert_eq!(products[0].price, Decimal::new(12050, 2));
    assert_eq!(products[0].stock_quantity, Decimal::new(125, 1));
    assert_eq!(products[0].price_label(), "₹120.50/kg");
}

#[tokio::test]
async fn test_error_body_on_bad_request() {
    let server = StubServer::builder().spawn().await;

    let err = server.backend().list_products("").await.unwrap_err();
    assert!(matches!(&err, ApiError::Backend(message) if message == "Category is required"));
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_error_body_with_success_status() {
    let server = StubServer::builder().with_default_catalog().spawn().await;
    server.fail(
        endpoints::PRODUCTS,
        Failure::ErrorBody {
            status: 200,
            message: "Database unavailable".to_string(),
        },
    );

    let err = server.backend().list_products("Vegetables").await.unwrap_err();
    assert_eq!(err.to_string(), "Database unavailable");
}

#[tokio::test]
async fn test_status_without_body_is_network_error() {
    let server = StubServer::builder().with_default_catalog().spawn().await;
    server.fail(endpoints::PRODUCTS, Failure::Status(500));

    let err = server.backend().list_products("Vegetables").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(NetworkError::Status(500))));
    assert_eq!(err.to_string(), "Network response was not ok (HTTP 500)");

    server.clear_failures();
    assert!(server.backend().list_products("Vegetables").await.is_ok());
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Nothing listens on the discard port.
    let config = TerminalConfig::for_backend("http://127.0.0.1:9").unwrap();
    let backend = HttpBackend::new(&config).unwrap();

    let err = backend.list_products("Vegetables").await.unwrap_err();
    assert!(err.is_network());
}

// =============================================================================
// Product detail
// =============================================================================

#[tokio::test]
async fn test_get_product() {
    let server = StubServer::builder().with_default_catalog().spawn().await;

    let product = server.backend().get_product(ProductId::new(3)).await.unwrap();
    assert_eq!(product, milk());
    assert_eq!(server.hits(endpoints::PRODUCT), 1);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let server = StubServer::builder().with_default_catalog().spawn().await;

    let err = server
        .backend()
        .get_product(ProductId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(&err, ApiError::NotFound(message) if message == "Product not found"));
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_is_idempotent() {
    let server = StubServer::builder().spawn().await;
    let backend = server.backend();

    let first = backend
        .register_customer("Asha", &phone("9876543210"))
        .await
        .unwrap();
    let again = backend
        .register_customer("Asha", &phone("9876543210"))
        .await
        .unwrap();
    let other = backend
        .register_customer("Ravi", &phone("9000000000"))
        .await
        .unwrap();

    assert_eq!(first.user_id, UserId::new(1));
    assert_eq!(again.user_id, first.user_id);
    assert_eq!(other.user_id, UserId::new(2));
    assert_eq!(first.name, "Asha");
    assert_eq!(first.phone.as_str(), "9876543210");
}

#[tokio::test]
async fn test_register_validation_error() {
    let server = StubServer::builder().spawn().await;

    let err = server
        .backend()
        .register_customer(" ", &phone("9876543210"))
        .await
        .unwrap_err();
    assert!(matches!(&err, ApiError::Validation(message) if message == "Name and phone are required"));
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = StubServer::builder()
        .with_default_catalog()
        .with_auth()
        .spawn()
        .await;

    // server.backend() carries the token.
    assert!(server.backend().list_products("Vegetables").await.is_ok());

    let anonymous =
        HttpBackend::new(&TerminalConfig::for_backend(server.url()).unwrap()).unwrap();
    let err = anonymous.list_products("Vegetables").await.unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized");
}

#[tokio::test]
async fn test_base_url_with_path_prefix_keeps_prefix() {
    let config = TerminalConfig::for_backend("http://localhost:8000/pos").unwrap();
    let backend = HttpBackend::new(&config).unwrap();
    assert_eq!(backend.base_url().as_str(), "http://localhost:8000/pos/");
}
