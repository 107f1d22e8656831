//! Agent Tool Port
//!
//! A tool is a named, schema-described async function the LLM may ask
//! the agent to run. Tools are collected once at startup into a
//! [`ToolRegistry`], which also renders the function-calling schema list
//! sent with every completion request.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::AgentContext;
use crate::domain::errors::DomainError;

/// A tool the agent can execute on the LLM's behalf
///
/// # Example
///
/// ```rust,ignore
/// use aperture::ports::AgentTool;
///
/// struct CountLeads { /* ... */ }
///
/// #[async_trait]
/// impl AgentTool for CountLeads {
///     fn name(&self) -> &str { "count_leads" }
///     fn description(&self) -> &str { "Count leads by status" }
///     fn parameters(&self) -> serde_json::Value { json!({"type": "object"}) }
///     async fn call(&self, args: Value, ctx: &mut AgentContext) -> Result<Value, DomainError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// Unique name the LLM uses to invoke the tool
    fn name(&self) -> &str;

    /// Human-readable description shown to the LLM
    fn description(&self) -> &str;

    /// JSON Schema of the arguments object
    fn parameters(&self) -> serde_json::Value;

    /// Run the tool
    ///
    /// Handlers run one at a time within a turn and may update the
    /// context's working memory.
    async fn call(
        &self,
        args: serde_json::Value,
        ctx: &mut AgentContext,
    ) -> Result<serde_json::Value, DomainError>;

    /// Function-calling schema entry for this tool
    fn to_function_tool(&self) -> FunctionTool {
        FunctionTool::new(self.name(), self.description(), self.parameters())
    }
}

/// `{"type": "function", "function": {...}}` schema entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl FunctionTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Name → tool mapping that remembers insertion order
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn AgentTool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool, replacing any tool already registered under its name
    ///
    /// A replaced tool keeps its original position.
    pub fn register(&mut self, tool: Arc<dyn AgentTool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentTool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tools in insertion order
    pub fn list(&self) -> Vec<Arc<dyn AgentTool>> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name).cloned())
            .collect()
    }

    /// All tool names in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Function-calling schema list for every registered tool
    pub fn function_tools(&self) -> Vec<FunctionTool> {
        self.list().iter().map(|t| t.to_function_tool()).collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}
