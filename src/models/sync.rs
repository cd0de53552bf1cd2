use serde::{Deserialize, Serialize};

use crate::services::master_data::SyncOutcome;

/// Query parameters shared by the master-data sync endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SyncQuery {
    #[serde(default)]
    pub force_refresh: bool,
    pub zone_id: Option<String>,
    pub vat_commissionrate_id: Option<String>,
    pub division_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

impl SyncResponse {
    pub fn from_outcome(what: &str, outcome: SyncOutcome) -> Self {
        Self {
            success: true,
            message: format!(
                "{} sync complete: {} new, {} updated, {} skipped",
                what, outcome.created, outcome.updated, outcome.skipped
            ),
            created: outcome.created,
            updated: outcome.updated,
            skipped: outcome.skipped,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub message: String,
    pub company_id: Option<String>,
}
