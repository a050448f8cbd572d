//! End-to-end order composition against the stub backend.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;
use store_counter_core::{PaymentMethod, ProductId, UserId};
use store_counter_integration_tests::{
    Failure, PresenterEvent, RecordingPresenter, StubServer, endpoints,
};
use store_counter_terminal::{
    Backend, Container, HttpBackend, ListContent, Panel, ProductResolution, Severity,
    WorkflowController, WorkflowState,
};

type Controller = WorkflowController<HttpBackend, RecordingPresenter>;

async fn counter() -> (StubServer, Controller) {
    let server = StubServer::builder().with_default_catalog().spawn().await;
    let controller = WorkflowController::new(server.backend(), RecordingPresenter::default());
    (server, controller)
}

#[tokio::test]
async fn test_compose_single_weighed_line() {
    let (server, mut ctl) = counter().await;

    // Typing the name alone does not register.
    ctl.customer_fields_changed("Asha", "").await.unwrap();
    assert_eq!(server.hits(endpoints::REGISTER), 0);
    assert_eq!(ctl.state(), WorkflowState::CustomerPending);

    ctl.customer_fields_changed("Asha", "9876543210")
        .await
        .unwrap();
    assert_eq!(ctl.state(), WorkflowState::CustomerReady);
    assert_eq!(
        ctl.presenter().statuses(Panel::Customer),
        vec![("Customer registered (ID: 1)", Severity::Success)]
    );

    let products = ctl.select_category("Vegetables").await.unwrap().unwrap();
    assert_eq!(products.len(), 2);

    ctl.select_product(ProductId::new(1)).await.unwrap();
    assert_eq!(ctl.state(), WorkflowState::ProductSelected);
    let policy = ctl.session().selected().unwrap().policy;
    assert_eq!(policy.step, Decimal::new(1, 1));
    assert_eq!(policy.max, Decimal::new(50, 0));

    ctl.confirm_quantity(Decimal::new(25, 1)).unwrap();
    assert_eq!(ctl.state(), WorkflowState::CategorySelected);

    let last_cart_render = ctl
        .presenter()
        .events
        .iter()
        .rev()
        .find_map(|event| match event {
            PresenterEvent::Render(Container::Cart, content) => Some(content.clone()),
            _ => None,
        })
        .unwrap();
    let ListContent::LineItems { lines, total_label } = last_cart_render else {
        panic!("expected cart lines");
    };
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "Tomato");
    assert_eq!(lines[0].line_total_label, "₹75.00");
    assert_eq!(total_label, "₹75.00");
}

#[tokio::test]
async fn test_compose_across_categories_and_hand_off() {
    let (_server, mut ctl) = counter().await;

    ctl.customer_fields_changed("Asha", "9876543210")
        .await
        .unwrap();
    ctl.select_category("Vegetables").await.unwrap();
    ctl.select_product(ProductId::new(2)).await.unwrap();
    ctl.confirm_quantity(Decimal::new(15, 1)).unwrap();
    ctl.select_category("Dairy").await.unwrap();
    ctl.select_product(ProductId::new(3)).await.unwrap();
    ctl.confirm_quantity(Decimal::new(2, 0)).unwrap();

    let request = ctl.checkout_request(PaymentMethod::Card).unwrap();
    assert_eq!(request.grand_total(), Decimal::new(110, 0));

    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(
        body,
        json!({
            "transactions": [
                {
                    "user_id": 1,
                    "product_id": 2,
                    "quantity": 1.5,
                    "unit_price": 40.0,
                    "total_price": 60.0,
                    "discount": 0.0,
                    "payment_method": "Card"
                },
                {
                    "user_id": 1,
                    "product_id": 3,
                    "quantity": 2.0,
                    "unit_price": 25.0,
                    "total_price": 50.0,
                    "discount": 0.0,
                    "payment_method": "Card"
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_quantity_over_stock_never_reaches_backend() {
    let (server, mut ctl) = counter().await;

    ctl.customer_fields_changed("Asha", "9876543210")
        .await
        .unwrap();
    ctl.select_category("Vegetables").await.unwrap();
    ctl.select_product(ProductId::new(1)).await.unwrap();
    let hits = server.hits(endpoints::PRODUCT) + server.hits(endpoints::PRODUCTS);

    let err = ctl.confirm_quantity(Decimal::new(60, 0)).unwrap_err();
    assert!(err.is_out_of_range());
    assert!(ctl.session().cart().is_empty());
    assert_eq!(
        server.hits(endpoints::PRODUCT) + server.hits(endpoints::PRODUCTS),
        hits
    );
    assert_eq!(ctl.presenter().statuses(Panel::Cart).len(), 1);
}

#[tokio::test]
async fn test_overlapping_product_picks() {
    let (server, mut ctl) = counter().await;

    ctl.customer_fields_changed("Asha", "9876543210")
        .await
        .unwrap();
    ctl.select_category("Vegetables").await.unwrap();

    let backend = server.backend();
    let first = ctl.begin_product_request(ProductId::new(1)).unwrap();
    let second = ctl.begin_product_request(ProductId::new(2)).unwrap();
    let (tomato, onion) = tokio::join!(
        backend.get_product(ProductId::new(1)),
        backend.get_product(ProductId::new(2))
    );

    // The newer pick lands first, the older one afterwards.
    let applied = ctl.complete_product_request(second, onion).unwrap();
    let dropped = ctl.complete_product_request(first, tomato).unwrap();

    assert!(matches!(applied, ProductResolution::Selected(ref s) if s.product.name == "Onion"));
    assert_eq!(dropped, ProductResolution::Superseded);
    assert_eq!(ctl.session().selected().unwrap().product.name, "Onion");

    let details: Vec<_> = ctl
        .presenter()
        .events
        .iter()
        .filter_map(|event| match event {
            PresenterEvent::ShowDetail(detail) => Some(detail.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(details, ["Onion"]);
}

#[tokio::test]
async fn test_backend_outage_reports_and_recovers() {
    let (server, mut ctl) = counter().await;

    ctl.customer_fields_changed("Asha", "9876543210")
        .await
        .unwrap();

    server.fail(endpoints::PRODUCTS, Failure::Status(503));
    assert!(ctl.select_category("Vegetables").await.is_err());
    assert_eq!(ctl.state(), WorkflowState::CustomerReady);
    assert_eq!(
        ctl.presenter().statuses(Panel::Product),
        vec![(
            "Error loading products: Network response was not ok (HTTP 503)",
            Severity::Error
        )]
    );

    server.clear_failures();
    ctl.select_category("Vegetables").await.unwrap();
    assert_eq!(ctl.state(), WorkflowState::CategorySelected);
}

#[tokio::test]
async fn test_registration_error_body_keeps_pending() {
    let (server, mut ctl) = counter().await;
    server.fail(
        endpoints::REGISTER,
        Failure::ErrorBody {
            status: 200,
            message: "Phone number already belongs to another customer".to_string(),
        },
    );

    assert!(
        ctl.customer_fields_changed("Asha", "9876543210")
            .await
            .is_err()
    );
    assert_eq!(ctl.state(), WorkflowState::CustomerPending);
    assert!(ctl.session().customer().is_none());
    assert_eq!(
        ctl.presenter().statuses(Panel::Customer),
        vec![(
            "Error registering customer: Phone number already belongs to another customer",
            Severity::Error
        )]
    );

    server.clear_failures();
    let customer = ctl
        .customer_fields_changed("Asha", "9876543210")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.user_id, UserId::new(1));
}

#[tokio::test]
async fn test_reset_starts_a_new_order() {
    let (_server, mut ctl) = counter().await;

    ctl.customer_fields_changed("Asha", "9876543210")
        .await
        .unwrap();
    ctl.select_category("Dairy").await.unwrap();
    ctl.select_product(ProductId::new(3)).await.unwrap();
    ctl.confirm_quantity(Decimal::ONE).unwrap();

    ctl.reset();
    assert_eq!(ctl.state(), WorkflowState::Idle);
    assert!(ctl.session().cart().is_empty());

    // Same customer again gets the same ID from the backend.
    let customer = ctl
        .customer_fields_changed("Asha", "9876543210")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.user_id, UserId::new(1));
}
