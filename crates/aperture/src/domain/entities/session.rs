//! Chat Session Entity
//!
//! A persisted conversation thread and the working memory the agent
//! carries between turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used for the studio owner until they introduce themselves
pub const DEFAULT_USER_NAME: &str = "business owner";

/// A conversation thread between a studio user and the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub studio_id: Uuid,
    pub user_id: Uuid,
    pub memory: WorkingMemory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(studio_id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            studio_id,
            user_id,
            memory: WorkingMemory::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Loosely typed key-value bag attached to a session
///
/// The well-known keys are typed; anything else the agent or a tool
/// stores lands in `extra` and round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingMemory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_interaction: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<InteractionContext>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// What the agent knows about the relationship with the current user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionContext {
    FirstInteraction {
        greeting: String,
    },
    Returning {
        previous_interactions: usize,
        last_seen: Option<DateTime<Utc>>,
        user_name: String,
    },
}

impl WorkingMemory {
    /// Annotate memory with the interaction context for this turn
    ///
    /// `history_len` is the number of stored messages in the session.
    pub fn annotate_interaction(&mut self, history_len: usize) {
        if history_len == 0 {
            self.user_name = Some(DEFAULT_USER_NAME.to_string());
            self.context = Some(InteractionContext::FirstInteraction {
                greeting: "This is our first conversation today".to_string(),
            });
        } else {
            let user_name = self
                .user_name
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
            self.context = Some(InteractionContext::Returning {
                previous_interactions: history_len,
                last_seen: self.last_interaction,
                user_name,
            });
        }
    }

    /// Record that an action just completed
    pub fn record_action(&mut self, action: Option<&str>) {
        if let Some(action) = action {
            self.last_action = Some(action.to_string());
        }
        self.last_interaction = Some(Utc::now());
    }
}
