//! SeaORM Entity for VAT invoices
//!
//! One row per finalized POS transaction. `total_sd_amount` is the VAT
//! charged at creation time and is never rewritten afterwards; returns
//! accumulate into `returned_amount` so the original charge stays
//! auditable. `raw_response` is an append-only log of every authority
//! reply, kept verbatim for compliance.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vat_invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub invoice_date: DateTime,
    pub order_id: String,
    pub customer_id: Option<String>,
    pub retailer_number: String,
    pub branch: Option<String>,
    pub service_type_code: String,
    pub zone_id: String,
    pub division_id: String,
    pub circle_id: String,
    pub txn_amount: Decimal,
    pub total_sd_percentage: Decimal,
    pub total_sd_amount: Decimal,
    pub total_discount_amount: Decimal,
    pub total_service_charges_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub status: InvoiceStatus,
    pub challan_id: Option<String>,
    pub returned_amount: Option<Decimal>,
    pub return_invoice_no: Option<String>,
    pub raw_response: Option<String>,
    pub synced_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Challan submission lifecycle.
///
/// Pending -> Synced | Failed, Failed -> Synced (retry),
/// Synced -> Return | PartlyReturn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Synced")]
    Synced,
    #[sea_orm(string_value = "Failed")]
    Failed,
    #[sea_orm(string_value = "Return")]
    Return,
    #[sea_orm(string_value = "Partly Return")]
    #[serde(rename = "Partly Return")]
    PartlyReturn,
}

impl InvoiceStatus {
    /// Whether a challan submission attempt is allowed from this state.
    pub fn can_sync(&self) -> bool {
        matches!(self, InvoiceStatus::Pending | InvoiceStatus::Failed)
    }

    /// Whether a return can be filed against this invoice.
    pub fn can_return(&self) -> bool {
        matches!(self, InvoiceStatus::Synced | InvoiceStatus::PartlyReturn)
    }

    /// Whether a rendered schallan exists to download.
    pub fn has_challan(&self) -> bool {
        matches!(
            self,
            InvoiceStatus::Synced | InvoiceStatus::Return | InvoiceStatus::PartlyReturn
        )
    }
}
