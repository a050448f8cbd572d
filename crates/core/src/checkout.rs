//! Checkout hand-off payload.
//!
//! The counter does not check out by itself. Once an order is composed, the
//! cart is handed to the external checkout stage as a `transactions` body,
//! one entry per line item. Building that body is all this module does.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::{Customer, ProductId, UserId};

/// Errors building a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
}

/// How the customer pays at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Card => write!(f, "Card"),
            Self::Upi => write!(f, "UPI"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            other => Err(format!("invalid payment method: {other}")),
        }
    }
}

/// One checkout transaction, built from a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTransaction {
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    pub payment_method: PaymentMethod,
}

/// Body of the checkout request handed to the external checkout stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub transactions: Vec<CheckoutTransaction>,
}

impl CheckoutRequest {
    /// Build the hand-off payload for a customer's cart, in cart order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there is nothing to check out.
    pub fn from_cart(
        customer: &Customer,
        cart: &Cart,
        payment_method: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let transactions = cart
            .lines()
            .iter()
            .map(|line| CheckoutTransaction {
                user_id: customer.user_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.line_total(),
                discount: Decimal::ZERO,
                payment_method,
            })
            .collect();

        Ok(Self { transactions })
    }

    /// Sum of all transaction totals.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.transactions
            .iter()
            .map(|t| t.total_price.saturating_sub(t.discount))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{CartAccumulator, Phone, Product, Unit};

    fn customer() -> Customer {
        Customer::new(UserId::new(42), "Asha", Phone::parse("9990001111").unwrap())
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let cart = Cart::default();
        assert_eq!(
            CheckoutRequest::from_cart(&customer(), &cart, PaymentMethod::Cash),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn test_transactions_follow_cart_order() {
        let mut acc = CartAccumulator::new();
        for (id, name, price, qty) in [(1, "Tomato", 30, 25), (2, "Rice", 120, 10)] {
            acc.select(Product {
                product_id: ProductId::new(id),
                name: name.to_string(),
                price: Decimal::new(price, 0),
                unit: Unit::Kg,
                stock_quantity: Decimal::new(100, 0),
            });
            acc.add_line_item(Decimal::new(qty, 1)).unwrap();
        }

        let request =
            CheckoutRequest::from_cart(&customer(), acc.cart(), PaymentMethod::Upi).unwrap();

        assert_eq!(request.transactions.len(), 2);
        assert_eq!(request.transactions[0].product_id, ProductId::new(1));
        assert_eq!(request.transactions[0].total_price, Decimal::new(75, 0));
        assert_eq!(request.transactions[1].total_price, Decimal::new(120, 0));
        assert_eq!(request.grand_total(), Decimal::new(195, 0));

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["transactions"][0]["user_id"], 42);
        assert_eq!(value["transactions"][0]["payment_method"], "UPI");
        assert_eq!(value["transactions"][0]["discount"], 0.0);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("cash".parse::<PaymentMethod>(), Ok(PaymentMethod::Cash));
        assert_eq!(" UPI ".parse::<PaymentMethod>(), Ok(PaymentMethod::Upi));
        assert!("cheque".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::default().to_string(), "Cash");
    }
}
