//! Mobile Store storefront library.
//!
//! Server-rendered catalog and cart pages over the mobiles REST API. The
//! library is shared by the storefront binary, the CLI and the integration
//! tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
