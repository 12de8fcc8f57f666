// Waitlist capture. informational only, no ledger logic reads these back.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub telegram: Option<String>,
    pub referral_code: Option<String>,
    pub joined_at: Timestamp,
}
