//! VAT invoice lifecycle: creation on POS finalization, challan
//! submission, returns, batch sync, and schallan download.
//!
//! Remote rejections and network failures during submission move the
//! invoice to Failed with the raw payload retained; they do not bubble
//! out of the batch. Credential and database problems do.

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::entities::vat_invoices::{self, InvoiceStatus};
use crate::entities::vendor_configuration::SyncSchedule;
use crate::errors::{IntegrationError, Result};
use crate::repo::invoices as repo;
use crate::services::authority::AuthorityClient;
use crate::services::jurisdiction::{self, Selection};
use crate::services::token::TokenManager;

/// Where downloaded schallan documents are written.
const SCHALLAN_DIR_ENV: &str = "SCHALLAN_DIR";
const SCHALLAN_DIR_DEFAULT: &str = "schallans";

/// A finalized POS transaction, as posted by the hosting platform.
#[derive(Debug, Clone, Deserialize)]
pub struct PosTransaction {
    pub order_id: String,
    pub customer_id: Option<String>,
    pub retailer_number: String,
    pub branch: Option<String>,
    pub service_type_code: String,
    pub zone_id: String,
    pub division_id: String,
    pub circle_id: String,
    pub txn_amount: Decimal,
    #[serde(default)]
    pub total_discount_amount: Decimal,
    #[serde(default)]
    pub total_service_charges_amount: Decimal,
    pub payment_method: String,
    pub invoice_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReturnRequest {
    pub return_invoice_no: String,
    pub returned_amount: Decimal,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchOutcome {
    pub total: u64,
    pub synced: u64,
    pub failed: u64,
}

/// Create a Pending invoice for a finalized POS transaction, computing
/// the SD amount from the matched commission rate. Under the
/// `AfterSubmit` schedule the challan is submitted immediately.
pub async fn create_vat_invoice(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    txn: PosTransaction,
) -> Result<vat_invoices::Model> {
    if txn.txn_amount < Decimal::ZERO {
        return Err(IntegrationError::Validation(
            "transaction amount cannot be negative".to_string(),
        ));
    }
    if let Some(existing) = repo::find_by_order_id(db, &txn.order_id).await? {
        return Err(IntegrationError::Validation(format!(
            "order {} already has VAT invoice {}",
            txn.order_id, existing.invoice_number
        )));
    }

    let selection = Selection {
        zone_id: &txn.zone_id,
        division_id: &txn.division_id,
        circle_id: &txn.circle_id,
    };
    let rate = jurisdiction::resolve_rate(db, &selection, &txn.service_type_code).await?;
    let sd_amount = jurisdiction::compute_sd_amount(txn.txn_amount, rate.rate);
    let total_amount = txn.txn_amount - txn.total_discount_amount
        + txn.total_service_charges_amount
        + sd_amount;

    let invoice = repo::insert_pending(
        db,
        repo::NewInvoice {
            invoice_date: txn.invoice_date.unwrap_or_else(|| Utc::now().naive_utc()),
            order_id: txn.order_id,
            customer_id: txn.customer_id,
            retailer_number: txn.retailer_number,
            branch: txn.branch,
            service_type_code: txn.service_type_code,
            zone_id: txn.zone_id,
            division_id: txn.division_id,
            circle_id: txn.circle_id,
            txn_amount: txn.txn_amount,
            total_sd_percentage: rate.rate,
            total_sd_amount: sd_amount,
            total_discount_amount: txn.total_discount_amount,
            total_service_charges_amount: txn.total_service_charges_amount,
            total_amount,
            payment_method: txn.payment_method,
        },
    )
    .await?;

    tracing::info!(
        "created {} for order {} (SD {} @ {}%)",
        invoice.invoice_number,
        invoice.order_id,
        invoice.total_sd_amount,
        invoice.total_sd_percentage
    );

    // Push immediately only when the operator configured it; the batch
    // job covers the Scheduled case.
    let submit_now = matches!(
        tokens.load_config().await,
        Ok(config) if config.sync_schedule == SyncSchedule::AfterSubmit
    );
    if submit_now {
        return sync_vat_invoice(db, tokens, authority, invoice.id).await;
    }

    Ok(invoice)
}

/// Submit the challan for a Pending or Failed invoice. Remote rejection
/// or a network failure marks the invoice Failed and returns the updated
/// record; the caller inspects the status.
pub async fn sync_vat_invoice(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    invoice_id: i32,
) -> Result<vat_invoices::Model> {
    let invoice = repo::find_by_id(db, invoice_id)
        .await?
        .ok_or_else(|| IntegrationError::NotFound(format!("VAT invoice {}", invoice_id)))?;

    if !invoice.status.can_sync() {
        return Err(IntegrationError::Validation(format!(
            "{} is {:?}; only Pending or Failed invoices can be synced",
            invoice.invoice_number, invoice.status
        )));
    }

    let payload = challan_payload(&invoice);
    let result = tokens
        .with_auth_retry(|session| {
            let payload = &payload;
            async move {
                let mut payload = payload.clone();
                payload["company_id"] = json!(session.company_id);
                authority.submit_challan(&session, &payload).await
            }
        })
        .await;

    match result {
        Ok(reply) => {
            let raw = serde_json::to_string(&reply).unwrap_or_default();
            let accepted = reply.status.eq_ignore_ascii_case("success");
            match (accepted, reply.challan_id) {
                (true, Some(challan_id)) => {
                    let updated = repo::mark_synced(db, invoice, challan_id, raw).await?;
                    tracing::info!(
                        "{} synced, challan {:?}",
                        updated.invoice_number,
                        updated.challan_id
                    );
                    Ok(updated)
                }
                _ => {
                    tracing::warn!(
                        "challan submission for {} answered without a challan id: {}",
                        invoice.invoice_number,
                        raw
                    );
                    Ok(repo::mark_failed(db, invoice, raw).await?)
                }
            }
        }
        Err(IntegrationError::RemoteValidation(msg)) => {
            tracing::warn!("challan for {} rejected: {}", invoice.invoice_number, msg);
            Ok(repo::mark_failed(db, invoice, msg).await?)
        }
        Err(IntegrationError::Network(e)) => {
            tracing::warn!("challan for {} failed on network: {}", invoice.invoice_number, e);
            Ok(repo::mark_failed(db, invoice, e.to_string()).await?)
        }
        Err(e) => Err(e),
    }
}

/// File a return against a Synced invoice. The original SD amount is
/// never touched; a full return moves to Return, a partial one to
/// Partly Return.
pub async fn return_vat_invoice(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    invoice_id: i32,
    request: ReturnRequest,
) -> Result<vat_invoices::Model> {
    let invoice = repo::find_by_id(db, invoice_id)
        .await?
        .ok_or_else(|| IntegrationError::NotFound(format!("VAT invoice {}", invoice_id)))?;

    if !invoice.status.can_return() {
        return Err(IntegrationError::Validation(format!(
            "{} is {:?}; only Synced invoices can be returned",
            invoice.invoice_number, invoice.status
        )));
    }
    if request.returned_amount <= Decimal::ZERO
        || request.returned_amount > invoice.total_amount
    {
        return Err(IntegrationError::Validation(format!(
            "returned amount {} must be positive and within the invoice total {}",
            request.returned_amount, invoice.total_amount
        )));
    }

    let challan_id = invoice.challan_id.clone().ok_or_else(|| {
        IntegrationError::Validation(format!(
            "{} has no challan id on record",
            invoice.invoice_number
        ))
    })?;

    let prior_returned = invoice.returned_amount.unwrap_or(Decimal::ZERO);
    let cumulative = prior_returned + request.returned_amount;
    let full_return = cumulative >= invoice.total_amount;

    let payload = json!({
        "challan_id": challan_id,
        "invoice_number": invoice.invoice_number,
        "return_invoice_no": request.return_invoice_no,
        "returned_amount": request.returned_amount,
    });

    let reply = tokens
        .with_auth_retry(|session| {
            let payload = &payload;
            async move {
                let mut payload = payload.clone();
                payload["company_id"] = json!(session.company_id);
                authority.return_challan(&session, &payload).await
            }
        })
        .await?;

    let raw = serde_json::to_string(&reply).unwrap_or_default();
    let updated = repo::mark_returned(
        db,
        invoice,
        cumulative,
        full_return,
        request.return_invoice_no,
        raw,
    )
    .await?;

    tracing::info!(
        "{} return recorded: {} of {} ({:?})",
        updated.invoice_number,
        cumulative,
        updated.total_amount,
        updated.status
    );
    Ok(updated)
}

/// Sync every Pending and Failed invoice, oldest first. One bad invoice
/// never aborts the batch; per-invoice outcomes are accumulated.
pub async fn auto_sync_vat_invoices(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
) -> Result<BatchOutcome> {
    let invoices = repo::pending_and_failed(db).await?;
    let mut outcome = BatchOutcome {
        total: invoices.len() as u64,
        ..Default::default()
    };

    for invoice in invoices {
        match sync_vat_invoice(db, tokens, authority, invoice.id).await {
            Ok(updated) if updated.status == InvoiceStatus::Synced => outcome.synced += 1,
            Ok(_) => outcome.failed += 1,
            Err(e) => {
                outcome.failed += 1;
                tracing::error!("batch sync of {} errored: {}", invoice.invoice_number, e);
            }
        }
    }

    tracing::info!(
        "invoice batch sync complete: {} synced, {} failed of {}",
        outcome.synced,
        outcome.failed,
        outcome.total
    );
    Ok(outcome)
}

/// Fetch the rendered schallan for a submitted invoice and persist it
/// locally. Returns the written file path; invoice state is unchanged.
pub async fn download_schallan(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    invoice_id: i32,
) -> Result<String> {
    let invoice = repo::find_by_id(db, invoice_id)
        .await?
        .ok_or_else(|| IntegrationError::NotFound(format!("VAT invoice {}", invoice_id)))?;

    if !invoice.status.has_challan() {
        return Err(IntegrationError::Validation(format!(
            "{} is {:?}; no schallan exists before a successful sync",
            invoice.invoice_number, invoice.status
        )));
    }
    let challan_id = invoice.challan_id.clone().ok_or_else(|| {
        IntegrationError::Validation(format!(
            "{} has no challan id on record",
            invoice.invoice_number
        ))
    })?;

    let bytes = tokens
        .with_auth_retry(|session| {
            let challan_id = &challan_id;
            async move { authority.download_schallan(&session, challan_id).await }
        })
        .await?;

    let dir = std::env::var(SCHALLAN_DIR_ENV)
        .unwrap_or_else(|_| SCHALLAN_DIR_DEFAULT.to_string());
    tokio::fs::create_dir_all(&dir).await?;
    let path = format!("{}/{}-{}.pdf", dir, invoice.invoice_number, challan_id);
    tokio::fs::write(&path, &bytes).await?;

    tracing::info!("schallan for {} written to {}", invoice.invoice_number, path);
    Ok(path)
}

/// Challan submission payload; field names are authority-defined.
fn challan_payload(invoice: &vat_invoices::Model) -> serde_json::Value {
    json!({
        "invoice_number": invoice.invoice_number,
        "invoice_date": invoice.invoice_date.format("%Y-%m-%d %H:%M:%S").to_string(),
        "order_id": invoice.order_id,
        "customer_id": invoice.customer_id,
        "retailer_number": invoice.retailer_number,
        "branch": invoice.branch,
        "service_type_code": invoice.service_type_code,
        "zone_id": invoice.zone_id,
        "division_id": invoice.division_id,
        "circle_id": invoice.circle_id,
        "txn_amount": invoice.txn_amount,
        "total_sd_percentage": invoice.total_sd_percentage,
        "total_sd_amount": invoice.total_sd_amount,
        "total_discount_amount": invoice.total_discount_amount,
        "total_service_charges_amount": invoice.total_service_charges_amount,
        "total_amount": invoice.total_amount,
        "payment_method": invoice.payment_method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn invoice(status: InvoiceStatus) -> vat_invoices::Model {
        vat_invoices::Model {
            id: 1,
            invoice_number: "VATINV-00001".to_string(),
            invoice_date: Utc::now().naive_utc(),
            order_id: "ORD-001".to_string(),
            customer_id: Some("CUST-001".to_string()),
            retailer_number: "R-100".to_string(),
            branch: Some("Main".to_string()),
            service_type_code: "ST-RESTAURANT".to_string(),
            zone_id: "Z-01".to_string(),
            division_id: "D-02".to_string(),
            circle_id: "C-03".to_string(),
            txn_amount: dec!(1200),
            total_sd_percentage: dec!(5),
            total_sd_amount: dec!(60),
            total_discount_amount: dec!(50),
            total_service_charges_amount: dec!(30),
            total_amount: dec!(1240),
            payment_method: "Cash".to_string(),
            status,
            challan_id: None,
            returned_amount: None,
            return_invoice_no: None,
            raw_response: None,
            synced_at: None,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn only_pending_and_failed_can_sync() {
        assert!(invoice(InvoiceStatus::Pending).status.can_sync());
        assert!(invoice(InvoiceStatus::Failed).status.can_sync());
        assert!(!invoice(InvoiceStatus::Synced).status.can_sync());
        assert!(!invoice(InvoiceStatus::Return).status.can_sync());
    }

    #[test]
    fn only_synced_invoices_can_return() {
        assert!(invoice(InvoiceStatus::Synced).status.can_return());
        assert!(invoice(InvoiceStatus::PartlyReturn).status.can_return());
        assert!(!invoice(InvoiceStatus::Pending).status.can_return());
        assert!(!invoice(InvoiceStatus::Failed).status.can_return());
    }

    #[test]
    fn challan_payload_preserves_authority_field_names() {
        let payload = challan_payload(&invoice(InvoiceStatus::Pending));
        for field in [
            "invoice_number",
            "invoice_date",
            "order_id",
            "retailer_number",
            "service_type_code",
            "zone_id",
            "division_id",
            "circle_id",
            "txn_amount",
            "total_sd_percentage",
            "total_sd_amount",
            "total_discount_amount",
            "total_service_charges_amount",
            "total_amount",
            "payment_method",
        ] {
            assert!(payload.get(field).is_some(), "missing field {}", field);
        }
    }

    #[test]
    fn invoice_date_uses_authority_timestamp_format() {
        let payload = challan_payload(&invoice(InvoiceStatus::Pending));
        let date = payload["invoice_date"].as_str().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").is_ok());
    }
}
