//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;
use uuid::Uuid;

use super::value_objects::Authority;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool {tool} failed: {message}")]
    ToolExecution { tool: String, message: String },
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: Uuid) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn tool_execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// A requested authority is missing from the studio policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Authority {authority} not granted for studio {studio_id}")]
pub struct AuthorizationError {
    pub authority: Authority,
    pub studio_id: Uuid,
}

/// Terminal failure of an agent turn
///
/// Wraps whatever aborted the turn; the display form is what callers see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Agent failed: {message}")]
pub struct AgentFailure {
    pub message: String,
}

impl AgentFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<DomainError> for AgentFailure {
    fn from(err: DomainError) -> Self {
        Self::new(err.to_string())
    }
}
