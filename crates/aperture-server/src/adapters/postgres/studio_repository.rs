//! PostgreSQL implementation of StudioRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use aperture::{Authority, DomainError, PolicyMode, StudioContext, StudioPolicy, StudioRepository};

pub struct PgStudioRepository {
    pool: PgPool,
}

impl PgStudioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StudioRow {
    id: Uuid,
    name: String,
    currency: String,
    policy_mode: String,
    authorities: Vec<String>,
    approval_required_over_amount: f64,
}

impl From<StudioRow> for StudioContext {
    fn from(row: StudioRow) -> Self {
        let mode = row.policy_mode.parse().unwrap_or_else(|e| {
            tracing::warn!("Studio {}: {}, falling back to propose", row.id, e);
            PolicyMode::Propose
        });

        let authorities = row
            .authorities
            .iter()
            .filter_map(|raw| match raw.parse::<Authority>() {
                Ok(a) => Some(a),
                Err(e) => {
                    tracing::warn!("Studio {}: skipping {}", row.id, e);
                    None
                }
            })
            .collect();

        Self {
            studio_id: row.id,
            studio_name: row.name,
            currency: row.currency,
            policy: StudioPolicy {
                mode,
                authorities,
                approval_required_over_amount: row.approval_required_over_amount,
            },
        }
    }
}

#[async_trait]
impl StudioRepository for PgStudioRepository {
    async fn load_context(&self, studio_id: Uuid) -> Result<Option<StudioContext>, DomainError> {
        let row = sqlx::query_as::<_, StudioRow>(
            r#"
            SELECT id, name, currency, policy_mode, authorities, approval_required_over_amount
            FROM studios
            WHERE id = $1
            "#,
        )
        .bind(studio_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_mapping_skips_unknown_authorities() {
        let row = StudioRow {
            id: Uuid::new_v4(),
            name: "Lumen & Co".to_string(),
            currency: "USD".to_string(),
            policy_mode: "autonomous".to_string(),
            authorities: vec![
                "READ_CRM".to_string(),
                "LAUNCH_ROCKETS".to_string(),
                "send_email".to_string(),
            ],
            approval_required_over_amount: 1200.0,
        };

        let studio: StudioContext = row.into();
        assert_eq!(studio.policy.mode, PolicyMode::Autonomous);
        assert_eq!(
            studio.policy.authorities,
            vec![Authority::ReadCrm, Authority::SendEmail]
        );
    }

    #[test]
    fn test_row_mapping_defaults_unknown_mode() {
        let row = StudioRow {
            id: Uuid::new_v4(),
            name: "Fieldnotes".to_string(),
            currency: "EUR".to_string(),
            policy_mode: "yolo".to_string(),
            authorities: vec![],
            approval_required_over_amount: 0.0,
        };

        let studio: StudioContext = row.into();
        assert_eq!(studio.policy.mode, PolicyMode::Propose);
        assert!(studio.policy.authorities.is_empty());
    }
}
