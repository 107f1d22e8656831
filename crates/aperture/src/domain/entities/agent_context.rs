//! Agent Context
//!
//! Request-scoped state for one agent turn. Tool handlers receive it
//! mutably and run one at a time.

use uuid::Uuid;

use super::{StudioContext, WorkingMemory};

#[derive(Debug, Clone)]
pub struct AgentContext {
    pub studio: StudioContext,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub memory: WorkingMemory,
}

impl AgentContext {
    pub fn studio_id(&self) -> Uuid {
        self.studio.studio_id
    }
}
