//! `global_search` - lead and client lookup across the studio CRM

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use aperture::domain::services::require_authority;
use aperture::{AgentContext, AgentTool, Authority, CrmSearch, DomainError};

pub const NAME: &str = "global_search";

/// Upper bound on rows per record type, whatever the model asks for
pub const MAX_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
struct Args {
    term: String,
    #[serde(default)]
    limit: Option<usize>,
}

pub struct GlobalSearchTool {
    search: Arc<dyn CrmSearch>,
    default_limit: usize,
}

impl GlobalSearchTool {
    pub fn new(search: Arc<dyn CrmSearch>, default_limit: usize) -> Self {
        Self {
            search,
            default_limit,
        }
    }
}

#[async_trait]
impl AgentTool for GlobalSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search the studio's leads and clients by name or email (case-insensitive, partial matches)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "term": {
                    "type": "string",
                    "description": "Name, partial name or email to look for"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_SEARCH_LIMIT,
                    "description": "Maximum rows per record type"
                }
            },
            "required": ["term"]
        })
    }

    async fn call(&self, args: Value, ctx: &mut AgentContext) -> Result<Value, DomainError> {
        require_authority(&ctx.studio, Authority::ReadCrm)?;

        let args: Args = serde_json::from_value(args)
            .map_err(|e| DomainError::tool_execution(NAME, format!("invalid arguments: {e}")))?;
        let term = args.term.trim();
        if term.is_empty() {
            return Err(DomainError::Validation("term must not be empty".to_string()));
        }
        let limit = args
            .limit
            .unwrap_or(self.default_limit)
            .clamp(1, MAX_SEARCH_LIMIT);

        let results = self.search.global_search(ctx.studio_id(), term, limit).await?;
        tracing::debug!(
            "🔍 global_search '{}' → {} leads, {} clients",
            term,
            results.leads.len(),
            results.clients.len()
        );

        Ok(json!({
            "success": true,
            "term": term,
            "leads": results.leads,
            "clients": results.clients,
        }))
    }
}
