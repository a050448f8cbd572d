//! Outbound UI collaborator.
//!
//! The workflow never reads UI state. It pushes view models and status
//! messages through a [`Presenter`], which a console, a web page or a test
//! recorder implements.

use serde::Serialize;
use store_counter_core::{Cart, LineItem, Price, Product, ProductId, QuantityPolicy};

/// Message shown when a category has no products.
pub const NO_PRODUCTS_MESSAGE: &str = "No products found in this category";

/// Message shown when the cart has no lines.
pub const EMPTY_CART_MESSAGE: &str = "Cart is empty";

/// Where a status message is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Panel {
    Customer,
    Product,
    Cart,
}

impl Panel {
    /// Element id of the panel's status line.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Customer => "customerStatus",
            Self::Product => "productStatus",
            Self::Cart => "cartStatus",
        }
    }
}

/// A list container the workflow renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Container {
    Products,
    Cart,
}

impl Container {
    /// Element id of the container.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Products => "productsContainer",
            Self::Cart => "cartContainer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

/// One product card in a category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub product_id: ProductId,
    pub name: String,
    /// e.g. `₹30.00/kg`
    pub price_label: String,
    /// e.g. `50 kg`
    pub stock_label: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name.clone(),
            price_label: product.price_label(),
            stock_label: product.stock_label(),
        }
    }
}

/// The detail panel for the selected product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetailView {
    pub product_id: ProductId,
    pub name: String,
    /// e.g. `₹30.00 per kg`
    pub price_label: String,
    /// e.g. `50 kg`
    pub available_label: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name.clone(),
            price_label: format!("{} per {}", product.unit_price().display(), product.unit),
            available_label: product.stock_label(),
        }
    }
}

/// One confirmed cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemView {
    pub product_id: ProductId,
    pub name: String,
    /// e.g. `2.5 kg`
    pub quantity_label: String,
    /// e.g. `₹30.00/kg`
    pub unit_price_label: String,
    /// e.g. `₹75.00`
    pub line_total_label: String,
}

impl From<&LineItem> for LineItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity_label: format!("{} {}", line.quantity.normalize(), line.unit),
            unit_price_label: format!(
                "{}{}",
                Price::from_amount(line.unit_price).display(),
                line.unit.price_suffix()
            ),
            line_total_label: Price::from_amount(line.line_total()).display(),
        }
    }
}

/// What a list container should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ListContent {
    Products(Vec<ProductView>),
    LineItems {
        lines: Vec<LineItemView>,
        total_label: String,
    },
    /// Nothing to list; show this message instead.
    Empty(String),
}

impl ListContent {
    /// Product cards for a category, or the "no products" message.
    #[must_use]
    pub fn for_products(products: &[Product]) -> Self {
        if products.is_empty() {
            Self::Empty(NO_PRODUCTS_MESSAGE.to_string())
        } else {
            Self::Products(products.iter().map(ProductView::from).collect())
        }
    }

    /// Cart lines with the running total, or the "empty cart" message.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        if cart.is_empty() {
            Self::Empty(EMPTY_CART_MESSAGE.to_string())
        } else {
            Self::LineItems {
                lines: cart.lines().iter().map(LineItemView::from).collect(),
                total_label: cart.total().display(),
            }
        }
    }
}

/// The UI primitives the workflow drives.
pub trait Presenter {
    /// Replace the contents of a list container.
    fn render_list(&mut self, container: Container, content: ListContent);

    /// Show a one-line status message on a panel.
    fn show_status(&mut self, panel: Panel, message: &str, severity: Severity);

    /// Configure the quantity input for the selected product.
    fn set_quantity_input_policy(&mut self, policy: &QuantityPolicy);

    /// Show the detail panel for the selected product.
    fn show_product_detail(&mut self, detail: &ProductDetailView);

    /// Hide the detail panel.
    fn hide_product_detail(&mut self);
}
