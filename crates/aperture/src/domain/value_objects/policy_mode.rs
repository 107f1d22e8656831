//! PolicyMode - How freely the agent may act for a studio

use serde::{Deserialize, Serialize};

/// Operating mode declared by a studio policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Only read tools may run
    ReadOnly,
    /// Actions are proposed for owner approval
    #[default]
    Propose,
    /// Actions run without approval (up to the amount limit)
    Autonomous,
}

impl std::fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyMode::ReadOnly => write!(f, "read_only"),
            PolicyMode::Propose => write!(f, "propose"),
            PolicyMode::Autonomous => write!(f, "autonomous"),
        }
    }
}

impl std::str::FromStr for PolicyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read_only" | "readonly" => Ok(PolicyMode::ReadOnly),
            "propose" => Ok(PolicyMode::Propose),
            "autonomous" | "auto" => Ok(PolicyMode::Autonomous),
            _ => Err(format!("Unknown policy mode: {}", s)),
        }
    }
}
