//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - StudioContext: studio identity and agent policy
//! - ChatSession / WorkingMemory: persisted conversation thread
//! - ConversationMessage: one history entry
//! - AgentContext: request-scoped state handed to tools
//! - Lead/Client summaries: CRM search projections

mod agent_context;
mod conversation;
mod crm;
mod session;
mod studio;

pub use agent_context::*;
pub use conversation::*;
pub use crm::*;
pub use session::*;
pub use studio::*;
