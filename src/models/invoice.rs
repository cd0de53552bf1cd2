use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::vat_invoices::{self, InvoiceStatus};
use crate::services::invoice::BatchOutcome;

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: i32,
    pub invoice_number: String,
    pub invoice_date: NaiveDateTime,
    pub order_id: String,
    pub customer_id: Option<String>,
    pub retailer_number: String,
    pub branch: Option<String>,
    pub service_type_code: String,
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
    pub synced_at: Option<NaiveDateTime>,
}

impl From<vat_invoices::Model> for InvoiceResponse {
    fn from(model: vat_invoices::Model) -> Self {
        Self {
            id: model.id,
            invoice_number: model.invoice_number,
            invoice_date: model.invoice_date,
            order_id: model.order_id,
            customer_id: model.customer_id,
            retailer_number: model.retailer_number,
            branch: model.branch,
            service_type_code: model.service_type_code,
            txn_amount: model.txn_amount,
            total_sd_percentage: model.total_sd_percentage,
            total_sd_amount: model.total_sd_amount,
            total_discount_amount: model.total_discount_amount,
            total_service_charges_amount: model.total_service_charges_amount,
            total_amount: model.total_amount,
            payment_method: model.payment_method,
            status: model.status,
            challan_id: model.challan_id,
            returned_amount: model.returned_amount,
            return_invoice_no: model.return_invoice_no,
            synced_at: model.synced_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SyncInvoiceResponse {
    pub success: bool,
    pub status: InvoiceStatus,
    pub challan_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BatchSyncResponse {
    pub success: bool,
    pub message: String,
    pub total: u64,
    pub synced: u64,
    pub failed: u64,
}

impl From<BatchOutcome> for BatchSyncResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            success: outcome.failed == 0,
            message: format!(
                "{} of {} invoices synced, {} failed",
                outcome.synced, outcome.total, outcome.failed
            ),
            total: outcome.total,
            synced: outcome.synced,
            failed: outcome.failed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SchallanResponse {
    pub success: bool,
    pub file_path: String,
}
