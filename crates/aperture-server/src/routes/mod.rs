//! Aperture API Routes
//!
//! - /api/agent/chat - One agent turn
//! - /api/agent/sessions/:id/messages - Conversation history
//! - /api/agent/tools - Tool schemas offered to the model

pub mod agent;
pub mod swagger;
