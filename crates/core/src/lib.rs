//! Mobile Store Core - Shared types library.
//!
//! This crate provides common types used across all Mobile Store components:
//! - `storefront` - Server-rendered catalog and cart pages
//! - `cli` - Command-line client for the mobiles API
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, carts, cart actions, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
