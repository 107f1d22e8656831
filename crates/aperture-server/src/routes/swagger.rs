//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    ChatRequest, ChatResponse, MessageResponse, ToolFunctionResponse, ToolSchemaResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::agent::chat,
        super::agent::get_session_messages,
        super::agent::list_tools,
    ),
    info(
        title = "Aperture API",
        version = "0.1.0",
        description = "CRM operations agent for photography studios.\n\nChat turns run a tool-calling LLM loop gated by per-studio authorities.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Agent", description = "Agent - Chat, history and tool schemas"),
    ),
    components(
        schemas(
            ChatRequest,
            ChatResponse,
            MessageResponse,
            ToolSchemaResponse,
            ToolFunctionResponse,
        )
    ),
)]
pub struct ApiDoc;
