//! Cart accumulation.
//!
//! The [`CartAccumulator`] holds everything an order needs before checkout:
//! the active customer, the product currently being looked at, and the
//! confirmed line items. It never talks to the backend.
//!
//! # Invariants
//!
//! - At most one customer is active; setting a new one replaces the old.
//! - The selection is a single slot, replaced on every new pick and cleared
//!   once a line item is confirmed from it.
//! - Line items are snapshots. Confirming appends, and nothing hands out a
//!   mutable reference to an existing line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Customer, Price, Product, ProductId, QuantityError, QuantityPolicy, Unit};

/// Errors raised by local cart preconditions. None of these reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No product is selected.
    #[error("no product selected")]
    NoSelection,

    /// The quantity breaks the selected product's input policy.
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    /// A correction referenced a line that does not exist.
    #[error("cart has no line {index} (cart has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// The line would push the cart total past what a decimal can hold.
    #[error("cart total is too large")]
    TotalOverflow,
}

impl CartError {
    /// Whether this is a quantity bound violation.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::Quantity(QuantityError::OutOfRange { .. }))
    }
}

/// One confirmed product + quantity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub unit: Unit,
}

impl LineItem {
    /// Snapshot a product at the moment a quantity is confirmed.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: Decimal) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            unit: product.unit.clone(),
        }
    }

    /// `unit_price * quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// Ordered, append-only list of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        Price::from_amount(
            self.lines
                .iter()
                .map(LineItem::line_total)
                .fold(Decimal::ZERO, Decimal::saturating_add),
        )
    }

    /// The total after adding `line`, or `None` if it does not fit.
    fn total_with(&self, line: &LineItem) -> Option<Decimal> {
        self.lines
            .iter()
            .chain(std::iter::once(line))
            .try_fold(Decimal::ZERO, |total, line| {
                total.checked_add(line.unit_price.checked_mul(line.quantity)?)
            })
    }

    fn push(&mut self, line: LineItem) {
        self.lines.push(line);
    }

    fn remove(&mut self, index: usize) -> Result<LineItem, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::LineNotFound {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

/// The product currently selected at the counter, with its derived input policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedProduct {
    pub product: Product,
    pub policy: QuantityPolicy,
}

impl SelectedProduct {
    #[must_use]
    pub fn new(product: Product) -> Self {
        let policy = QuantityPolicy::for_product(&product);
        Self { product, policy }
    }
}

/// Session-scoped order state: customer, selection and cart.
#[derive(Debug, Clone, Default)]
pub struct CartAccumulator {
    customer: Option<Customer>,
    selected: Option<SelectedProduct>,
    cart: Cart,
}

impl CartAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active customer, if one has been registered.
    #[must_use]
    pub const fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Replace the active customer, returning the previous one.
    pub fn set_customer(&mut self, customer: Customer) -> Option<Customer> {
        self.customer.replace(customer)
    }

    /// The current selection, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&SelectedProduct> {
        self.selected.as_ref()
    }

    /// Replace the selection with a freshly resolved product.
    pub fn select(&mut self, product: Product) -> &SelectedProduct {
        self.selected.insert(SelectedProduct::new(product))
    }

    /// Drop the selection without confirming it.
    pub fn clear_selection(&mut self) -> Option<SelectedProduct> {
        self.selected.take()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Confirm a quantity for the selected product.
    ///
    /// The bound is checked against the stock cached at fetch time. On
    /// success the line is appended and the selection cleared; on failure
    /// nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoSelection`] when nothing is selected and
    /// [`CartError::Quantity`] when the quantity breaks the product's policy.
    /// Returns [`CartError::TotalOverflow`] when the cart total would no
    /// longer be representable.
    pub fn add_line_item(&mut self, quantity: Decimal) -> Result<LineItem, CartError> {
        let selected = self.selected.as_ref().ok_or(CartError::NoSelection)?;
        selected.policy.validate(quantity)?;

        let line = LineItem::snapshot(&selected.product, quantity);
        if self.cart.total_with(&line).is_none() {
            return Err(CartError::TotalOverflow);
        }
        self.selected = None;
        self.cart.push(line.clone());
        Ok(line)
    }

    /// Remove a confirmed line so it can be re-added with a corrected quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if `index` is past the end.
    pub fn remove_line_item(&mut self, index: usize) -> Result<LineItem, CartError> {
        self.cart.remove(index)
    }

    /// Empty the cart, keeping the customer and selection.
    pub fn clear(&mut self) {
        self.cart.clear();
    }

    /// Forget everything: customer, selection and cart.
    pub fn reset(&mut self) {
        self.customer = None;
        self.selected = None;
        self.cart.clear();
    }
}
