//! Service Ports
//!
//! Abstract interfaces for external services.

mod crm_search;
mod llm_provider;

pub use crm_search::*;
pub use llm_provider::*;
