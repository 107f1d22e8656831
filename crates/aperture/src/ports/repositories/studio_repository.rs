//! Studio Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, StudioContext};

/// Repository interface for studio identity and policy
#[async_trait]
pub trait StudioRepository: Send + Sync {
    /// Load the studio context, or `None` when the studio does not exist
    async fn load_context(&self, studio_id: Uuid) -> Result<Option<StudioContext>, DomainError>;
}
