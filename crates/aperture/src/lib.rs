//! Aperture Domain Library
//!
//! Core types and interfaces for the Aperture studio CRM agent.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: StudioContext, ChatSession, WorkingMemory, ConversationMessage
//!   - `value_objects/`: Authority, PolicyMode, MessageRole
//!   - `services/`: authority checks, search shortcut, prompt rendering
//!   - `errors/`: DomainError, AuthorizationError, AgentFailure
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: session and studio storage
//!   - `services/`: LLM provider, CRM search
//!   - `tools`: AgentTool and ToolRegistry
//!
//! # Usage
//!
//! ```rust,ignore
//! use aperture::domain::services::require_authority;
//! use aperture::{Authority, ToolRegistry};
//!
//! require_authority(&ctx.studio, Authority::SendEmail)?;
//! let schema = registry.function_tools();
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AgentContext, AgentFailure, Authority, AuthorizationError, ChatSession, ClientSummary,
    ConversationMessage, DomainError, InteractionContext, LeadSummary, MessageRole, PolicyMode,
    SearchResults, StudioContext, StudioPolicy, WorkingMemory,
};
pub use ports::{
    AgentTool, ChatMessage, CompletionOptions, CompletionResponse, CrmSearch, FunctionCall,
    FunctionDefinition, FunctionTool, LlmProvider, SessionRepository, StudioRepository, TokenUsage,
    ToolCall, ToolRegistry,
};
