//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the agent reaches storage, the
//! LLM and the CRM, plus the tool contract and registry.
//!
//! Implementations of the storage and service traits live in the server
//! crate.

pub mod repositories;
pub mod services;
pub mod tools;

pub use repositories::*;
pub use services::*;
pub use tools::*;
