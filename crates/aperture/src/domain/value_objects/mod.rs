//! Value Objects
//!
//! Immutable value types shared across entities.

mod authority;
mod message_role;
mod policy_mode;

pub use authority::*;
pub use message_role::*;
pub use policy_mode::*;
