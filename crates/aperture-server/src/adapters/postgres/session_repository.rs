//! PostgreSQL implementation of SessionRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use aperture::{ChatSession, ConversationMessage, DomainError, SessionRepository, WorkingMemory};

/// PostgreSQL implementation of SessionRepository
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    studio_id: Uuid,
    user_id: Uuid,
    memory: Json<WorkingMemory>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<SessionRow> for ChatSession {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            studio_id: row.studio_id,
            user_id: row.user_id,
            memory: row.memory.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    session_id: Uuid,
    role: String,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<MessageRow> for ConversationMessage {
    type Error = DomainError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            session_id: row.session_id,
            role: row.role.parse().map_err(DomainError::Repository)?,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_latest(
        &self,
        studio_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ChatSession>, DomainError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, studio_id, user_id, memory, created_at, updated_at
            FROM chat_sessions
            WHERE studio_id = $1 AND user_id = $2
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(studio_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChatSession>, DomainError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, studio_id, user_id, memory, created_at, updated_at FROM chat_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, session: &ChatSession) -> Result<ChatSession, DomainError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO chat_sessions (id, studio_id, user_id, memory, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, studio_id, user_id, memory, created_at, updated_at
            "#,
        )
        .bind(session.id)
        .bind(session.studio_id)
        .bind(session.user_id)
        .bind(Json(&session.memory))
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn update_memory(
        &self,
        session_id: Uuid,
        memory: &WorkingMemory,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE chat_sessions SET memory = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(session_id)
        .bind(Json(memory))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("ChatSession", session_id));
        }
        Ok(())
    }

    async fn append_message(&self, message: &ConversationMessage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, session_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id)
        .bind(message.session_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn recent_messages(
        &self,
        session_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>, DomainError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, session_id, role, content, created_at FROM (
                SELECT seq, id, session_id, role, content, created_at
                FROM chat_messages
                WHERE session_id = $1
                ORDER BY seq DESC
                LIMIT $2
            ) recent
            ORDER BY seq ASC
            "#,
        )
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
