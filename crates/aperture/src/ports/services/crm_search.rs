//! CRM Search Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, SearchResults};

/// Read-only search across a studio's CRM records
#[async_trait]
pub trait CrmSearch: Send + Sync {
    /// Case-insensitive substring match on names and emails
    async fn global_search(
        &self,
        studio_id: Uuid,
        term: &str,
        limit: usize,
    ) -> Result<SearchResults, DomainError>;
}
