//! One-shot catalog lookups.
//!
//! # Usage
//!
//! ```bash
//! pos-cli products Vegetables
//! pos-cli product 12
//! ```

use store_counter_core::{ProductId, QuantityPolicy};
use store_counter_terminal::presenter::ProductDetailView;
use store_counter_terminal::{Backend, Container, HttpBackend, ListContent, Presenter};

use super::CommandError;
use crate::console::ConsolePresenter;

/// List the products of a category.
///
/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn list(backend: &HttpBackend, category: &str) -> Result<(), CommandError> {
    tracing::info!(category, "Listing category");
    let products = backend.list_products(category.trim()).await?;

    let mut console = ConsolePresenter::stdout();
    console.render_list(Container::Products, ListContent::for_products(&products));
    Ok(())
}

/// Show the detail of one product with its quantity input policy.
///
/// # Errors
///
/// Returns an error if the backend call fails or the product does not exist.
pub async fn show(backend: &HttpBackend, product_id: ProductId) -> Result<(), CommandError> {
    tracing::info!(%product_id, "Fetching product");
    let product = backend.get_product(product_id).await?;

    let mut console = ConsolePresenter::stdout();
    console.show_product_detail(&ProductDetailView::from(&product));
    console.set_quantity_input_policy(&QuantityPolicy::for_product(&product));
    Ok(())
}
