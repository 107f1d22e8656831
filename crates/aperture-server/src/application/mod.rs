//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod agent_service;
mod tool_executor;

pub use agent_service::{AgentReply, AgentService, AgentSettings};
pub use tool_executor::{execute_tool_call, surface_tool_errors, ToolCallOutcome};
