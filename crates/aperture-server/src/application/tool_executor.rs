//! Tool call execution
//!
//! Turns each model-requested call into a tool message. Failures never
//! propagate: they become `{"success": false, "tool": .., "error": ..}`
//! payloads so the model can see what went wrong and adapt.

use serde_json::{json, Value};

use aperture::{AgentContext, ChatMessage, DomainError, ToolCall, ToolRegistry};

/// Result of executing one tool call
#[derive(Debug, Clone)]
pub struct ToolCallOutcome {
    pub tool_call_id: String,
    pub name: String,
    /// JSON text sent back to the model
    pub output: String,
    pub error: Option<String>,
    /// The handler ran; false for unknown tools and unparsable arguments
    pub executed: bool,
}

impl ToolCallOutcome {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::tool(&self.tool_call_id, &self.output)
    }
}

/// Execute a single tool call against the registry
pub async fn execute_tool_call(
    registry: &ToolRegistry,
    call: &ToolCall,
    ctx: &mut AgentContext,
) -> ToolCallOutcome {
    let name = call.function.name.as_str();
    tracing::debug!("🔧 Tool call {} → {}({})", call.id, name, call.function.arguments);

    let mut executed = false;
    let result = match registry.get(name) {
        None => Err(DomainError::ToolNotFound(name.to_string())),
        Some(tool) => match parse_arguments(&call.function.arguments) {
            Ok(args) => {
                executed = true;
                tool.call(args, ctx).await
            }
            Err(e) => Err(DomainError::tool_execution(name, format!("invalid arguments: {e}"))),
        },
    };

    match result {
        Ok(value) => ToolCallOutcome {
            tool_call_id: call.id.clone(),
            name: name.to_string(),
            output: value.to_string(),
            error: None,
            executed,
        },
        Err(e) => {
            let message = e.to_string();
            tracing::error!("❌ Tool {} failed: {}", name, message);
            ToolCallOutcome {
                tool_call_id: call.id.clone(),
                name: name.to_string(),
                output: json!({ "success": false, "tool": name, "error": message }).to_string(),
                error: Some(message),
                executed,
            }
        }
    }
}

/// `name: error; name: error` over the failed outcomes, `None` when all succeeded
pub fn surface_tool_errors(outcomes: &[ToolCallOutcome]) -> Option<String> {
    let errors: Vec<String> = outcomes
        .iter()
        .filter_map(|o| o.error.as_ref().map(|e| format!("{}: {}", o.name, e)))
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    }
}

// Models occasionally send an empty string for "no arguments"
fn parse_arguments(raw: &str) -> Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(raw)
}
