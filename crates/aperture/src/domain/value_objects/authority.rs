//! Authority - Permission tokens gating CRM operations

use serde::{Deserialize, Serialize};

/// A permission a studio policy may grant to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authority {
    ReadCrm,
    CreateLead,
    UpdateLead,
    UpdateClient,
    CreateInvoice,
    SendInvoice,
    SendEmail,
    ScheduleSession,
    ManageGallery,
    ManageAutomation,
}

impl Authority {
    /// Every known authority, in declaration order
    pub const ALL: [Authority; 10] = [
        Authority::ReadCrm,
        Authority::CreateLead,
        Authority::UpdateLead,
        Authority::UpdateClient,
        Authority::CreateInvoice,
        Authority::SendInvoice,
        Authority::SendEmail,
        Authority::ScheduleSession,
        Authority::ManageGallery,
        Authority::ManageAutomation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::ReadCrm => "READ_CRM",
            Authority::CreateLead => "CREATE_LEAD",
            Authority::UpdateLead => "UPDATE_LEAD",
            Authority::UpdateClient => "UPDATE_CLIENT",
            Authority::CreateInvoice => "CREATE_INVOICE",
            Authority::SendInvoice => "SEND_INVOICE",
            Authority::SendEmail => "SEND_EMAIL",
            Authority::ScheduleSession => "SCHEDULE_SESSION",
            Authority::ManageGallery => "MANAGE_GALLERY",
            Authority::ManageAutomation => "MANAGE_AUTOMATION",
        }
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Authority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Authority::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| format!("Unknown authority: {}", s))
    }
}
