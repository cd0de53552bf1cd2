//! SeaORM Entity for the POS vendor configuration singleton
//!
//! One row per deployment: authority credentials plus the currently
//! cached access token. The token fields are only written by the token
//! manager after a successful authentication.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_configuration")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Authority API root, e.g. "https://vat.example.gov"
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub access_token: Option<String>,
    pub token_expiry: Option<DateTime>,
    /// Assigned by the authority on first authentication
    pub company_id: Option<String>,
    pub disabled: bool,
    pub sync_schedule: SyncSchedule,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// When finalized POS transactions are pushed to the authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SyncSchedule {
    /// Submit the challan immediately after the invoice is created
    #[sea_orm(string_value = "After Submit")]
    AfterSubmit,
    /// Leave the invoice Pending for the batch job
    #[sea_orm(string_value = "Scheduled")]
    Scheduled,
}
