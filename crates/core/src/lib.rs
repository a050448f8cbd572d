//! Store Counter Core - Domain types for the point-of-sale front end.
//!
//! This crate provides the types shared by every Store Counter component:
//! - `terminal` - Backend client and order-composition workflow
//! - `cli` - Clerk console and one-shot catalog commands
//!
//! # Architecture
//!
//! The core crate contains only types and in-memory logic - no I/O, no HTTP
//! clients. Everything here is deterministic and can be tested without a
//! backend.
//!
//! # Modules
//!
//! - [`types`] - Ids, prices, units, products, customers and quantity policies
//! - [`cart`] - Line items, the append-only cart and the cart accumulator
//! - [`checkout`] - Hand-off payload for the external checkout stage

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod types;

pub use cart::{Cart, CartAccumulator, CartError, LineItem, SelectedProduct};
pub use checkout::{CheckoutError, CheckoutRequest, CheckoutTransaction, PaymentMethod};
pub use types::*;
