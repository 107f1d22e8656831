//! PostgreSQL implementation of CrmSearch

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use aperture::{ClientSummary, CrmSearch, DomainError, LeadSummary, SearchResults};

pub struct PgCrmSearch {
    pool: PgPool,
}

impl PgCrmSearch {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LeadRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    status: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
}

/// Escape LIKE wildcards so the term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl CrmSearch for PgCrmSearch {
    async fn global_search(
        &self,
        studio_id: Uuid,
        term: &str,
        limit: usize,
    ) -> Result<SearchResults, DomainError> {
        let pattern = like_pattern(term);
        let limit = i64::try_from(limit)
            .map_err(|_| DomainError::Validation(format!("search limit {limit} is out of range")))?;

        let leads = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, name, email, status
            FROM crm_leads
            WHERE studio_id = $1 AND (name ILIKE $2 OR email ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(studio_id)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let clients = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, email, phone
            FROM crm_clients
            WHERE studio_id = $1 AND (name ILIKE $2 OR email ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(studio_id)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(SearchResults {
            leads: leads
                .into_iter()
                .map(|r| LeadSummary {
                    id: r.id,
                    name: r.name,
                    email: r.email,
                    status: r.status,
                })
                .collect(),
            clients: clients
                .into_iter()
                .map(|r| ClientSummary {
                    id: r.id,
                    name: r.name,
                    email: r.email,
                    phone: r.phone,
                })
                .collect(),
        })
    }
}
