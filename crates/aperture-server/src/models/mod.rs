//! Aperture Data Models
//!
//! HTTP request/response shapes; domain types live in the `aperture` crate.

mod agent;

pub use agent::*;
