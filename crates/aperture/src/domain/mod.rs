//! Domain Layer
//!
//! Studio, session and authority types plus the pure logic the agent
//! loop builds on. Nothing here touches the network or the database.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
