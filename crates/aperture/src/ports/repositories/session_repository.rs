//! Session Repository Port
//!
//! Abstract interface for chat sessions and their conversation history.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, ChatSession, ConversationMessage, WorkingMemory};

/// Repository interface for chat sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Most recently updated session for a studio user
    async fn find_latest(
        &self,
        studio_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ChatSession>, DomainError>;

    /// Find a session by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChatSession>, DomainError>;

    /// Persist a new session
    async fn create(&self, session: &ChatSession) -> Result<ChatSession, DomainError>;

    /// Replace the working memory of a session
    async fn update_memory(
        &self,
        session_id: Uuid,
        memory: &WorkingMemory,
    ) -> Result<(), DomainError>;

    /// Append a message to the session history
    async fn append_message(&self, message: &ConversationMessage) -> Result<(), DomainError>;

    /// Last `limit` messages of a session, oldest first
    async fn recent_messages(
        &self,
        session_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>, DomainError>;
}
