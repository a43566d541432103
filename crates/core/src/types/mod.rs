//! Core types for the Mobile Store.
//!
//! This module provides type-safe wrappers for the mobiles API records.

pub mod action;
pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use action::CartAction;
pub use cart::Cart;
pub use id::ProductId;
pub use price::{CurrencyCode, Price, UnknownCurrency};
pub use product::Product;
