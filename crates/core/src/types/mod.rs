//! Core types for Store Counter.
//!
//! This module provides type-safe wrappers for the catalog and customer
//! concepts the workflow passes around.

pub mod catalog;
pub mod id;
pub mod phone;
pub mod price;
pub mod quantity;
pub mod unit;

pub use catalog::{Customer, Product};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::{CurrencyCode, Price};
pub use quantity::{QuantityError, QuantityPolicy};
pub use unit::Unit;
