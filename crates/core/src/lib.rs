//! # agentdist Core
//!
//! Domain types, traits, and error definitions for the agentdist runtime.
//! This crate has **no transport dependencies**. It defines the domain model
//! that the catalog client, the oracle providers and the agent loop all
//! implement against.
//!
//! ## Design Philosophy
//!
//! Each external collaborator is a trait here:
//! - [`Provider`]: the language-model oracle (text in, text out)
//! - [`Catalog`]: the read-only agent registry
//!
//! Implementations live in their own crates, so the router and the
//! reasoning loop can be tested against scripted stand-ins.

pub mod catalog;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use catalog::{AgentDescriptor, CapabilityContract, Catalog, IntentGroup};
pub use error::{ActionError, CatalogError, Error, ProviderError, Result};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
