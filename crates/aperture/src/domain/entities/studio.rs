//! Studio Entity
//!
//! Identity and policy of the photography studio the agent works for.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{Authority, PolicyMode};

/// Studio identity plus its agent policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioContext {
    pub studio_id: Uuid,
    pub studio_name: String,
    /// ISO currency code used for amounts (e.g. "EUR")
    pub currency: String,
    pub policy: StudioPolicy,
}

/// Permissions and limits a studio grants to the agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioPolicy {
    pub mode: PolicyMode,
    pub authorities: Vec<Authority>,
    /// Actions above this amount need owner approval
    pub approval_required_over_amount: f64,
}

impl StudioPolicy {
    pub fn authorities_csv(&self) -> String {
        self.authorities
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
