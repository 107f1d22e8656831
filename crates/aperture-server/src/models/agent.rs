//! Agent - chat turns, history and tool schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use aperture::{ConversationMessage, FunctionTool};

use crate::application::AgentReply;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 500;

// ============================================
// Request/Response DTOs
// ============================================

/// Chat request - one user message for the agent
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub studio_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
}

/// Chat response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub response: String,
    /// Tools the agent called while answering
    pub tools_used: Vec<String>,
    /// True when the search shortcut answered without the LLM
    pub shortcut: bool,
}

impl From<AgentReply> for ChatResponse {
    fn from(reply: AgentReply) -> Self {
        Self {
            session_id: reply.session_id,
            response: reply.response,
            tools_used: reply.tools_used,
            shortcut: reply.shortcut,
        }
    }
}

/// Stored conversation message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    /// user | assistant | system | tool
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ConversationMessage> for MessageResponse {
    fn from(message: ConversationMessage) -> Self {
        Self {
            id: message.id,
            role: message.role.to_string(),
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// History query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of most recent messages (default 50, max 500)
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

/// Function-calling schema entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolSchemaResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ToolFunctionResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolFunctionResponse {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object
    #[schema(value_type = Object)]
    pub parameters: serde_json::Value,
}

impl From<FunctionTool> for ToolSchemaResponse {
    fn from(tool: FunctionTool) -> Self {
        Self {
            kind: tool.kind,
            function: ToolFunctionResponse {
                name: tool.function.name,
                description: tool.function.description,
                parameters: tool.function.parameters,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_limit_defaults_and_clamps() {
        assert_eq!(HistoryQuery { limit: None }.effective_limit(), 50);
        assert_eq!(HistoryQuery { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(HistoryQuery { limit: Some(10_000) }.effective_limit(), 500);
    }
}
