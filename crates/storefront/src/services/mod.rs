//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart_sync` - Cart synchronization: every mutation round-trips through
//!   the API and the response replaces the store's cart
//! - `catalog` - Catalog loading with explicit request state

pub mod cart_sync;
pub mod catalog;

pub use cart_sync::CartSync;
pub use catalog::{CatalogState, load_catalog};
