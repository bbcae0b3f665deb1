//! LLM oracle providers for agentdist.
//!
//! Every backend implements `agentdist_core::Provider`;
//! [`build_oracle_provider`] picks the one named in the config.

pub mod openai_compat;
pub mod oracle;

pub use openai_compat::OpenAiCompatProvider;
pub use oracle::build_oracle_provider;
