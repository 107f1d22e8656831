//! `update_memory` - lets the model keep track of what it is working on

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use aperture::{AgentContext, AgentTool, DomainError};

pub const NAME: &str = "update_memory";

#[derive(Debug, Default, Deserialize)]
struct Args {
    current_goal: Option<String>,
    selected_client_id: Option<String>,
    notes: Option<String>,
}

pub struct UpdateMemoryTool;

#[async_trait]
impl AgentTool for UpdateMemoryTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Update working memory: the current goal, the client being worked on, or free-form notes."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "current_goal": {"type": "string"},
                "selected_client_id": {"type": "string"},
                "notes": {"type": "string"}
            }
        })
    }

    async fn call(&self, args: Value, ctx: &mut AgentContext) -> Result<Value, DomainError> {
        let args: Args = if args.is_null() {
            Args::default()
        } else {
            serde_json::from_value(args)
                .map_err(|e| DomainError::tool_execution(NAME, format!("invalid arguments: {e}")))?
        };

        let mut updated = Vec::new();
        if let Some(goal) = args.current_goal {
            ctx.memory.current_goal = Some(goal);
            updated.push("current_goal");
        }
        if let Some(client_id) = args.selected_client_id {
            ctx.memory.selected_client_id = Some(client_id);
            updated.push("selected_client_id");
        }
        if let Some(notes) = args.notes {
            ctx.memory.extra.insert("notes".to_string(), Value::String(notes));
            updated.push("notes");
        }

        Ok(json!({ "success": true, "updated": updated }))
    }
}
