//! Error types for the agentdist domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; only [`Error`] ever
//! crosses an invocation boundary.

use thiserror::Error;

/// The top-level error type for all agentdist operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Oracle errors (fatal for an invocation) ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Catalog errors ---
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of the read-only catalog interface.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The registry could not be reached or answered with a failure status.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Agent '{0}' not found in registry")]
    AgentNotFound(String),

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Per-step action failures.
///
/// None of these abort the reasoning loop; each one is rendered into an
/// observation and fed back to the oracle on the next step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("{0}")]
    Parse(String),

    #[error("Agent '{0}' not found.")]
    AgentNotFound(String),

    #[error("{status}: {body}")]
    InvocationFailed { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("Agent '{0}' requires user confirmation")]
    ConfirmationRequired(String),
}
