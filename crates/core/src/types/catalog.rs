//! Catalog and customer records as the backend returns them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Phone, Price, ProductId, Unit, UserId};

/// A product snapshot fetched from the catalog.
///
/// Read-only: the counter never writes a product back. `stock_quantity` is
/// whatever the backend reported at fetch time and may go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    /// Price per [`Unit`], a JSON number on the wire.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub unit: Unit,
    #[serde(with = "rust_decimal::serde::float")]
    pub stock_quantity: Decimal,
}

impl Product {
    /// Price per unit in the counter currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }

    /// Price label with the unit suffix, e.g. `₹30.00/kg`.
    #[must_use]
    pub fn price_label(&self) -> String {
        format!("{}{}", self.unit_price().display(), self.unit.price_suffix())
    }

    /// Stock label, e.g. `50 kg`.
    #[must_use]
    pub fn stock_label(&self) -> String {
        format!("{} {}", self.stock_quantity.normalize(), self.unit)
    }
}

/// The walk-in customer an order is being composed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub user_id: UserId,
    pub name: String,
    pub phone: Phone,
}

impl Customer {
    /// Create a customer record from a registration result.
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>, phone: Phone) -> Self {
        Self {
            user_id,
            name: name.into(),
            phone,
        }
    }
}
