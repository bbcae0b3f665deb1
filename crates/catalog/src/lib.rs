//! Agent registry clients.
//!
//! Both clients implement `agentdist_core::Catalog`:
//! - [`HttpCatalog`] talks to the registry service over REST
//! - [`StaticCatalog`] serves a fixed snapshot (tests, offline runs)

pub mod http;
pub mod snapshot;

pub use http::HttpCatalog;
pub use snapshot::{CatalogSnapshot, StaticCatalog};
