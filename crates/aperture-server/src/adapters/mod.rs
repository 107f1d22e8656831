//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod openai;
pub mod postgres;

// Re-exports
pub use openai::OpenAiProvider;
pub use postgres::{PgCrmSearch, PgSessionRepository, PgStudioRepository};
