//! Persistence for VAT invoices and their status transitions.
//!
//! Status writes always go through the `mark_*` functions so the audit
//! columns (`raw_response`, `synced_at`, `returned_amount`) stay
//! consistent with the status they belong to.

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::vat_invoices::{self, InvoiceStatus};
use crate::entities::prelude::*;
use crate::errors::Result;

pub struct NewInvoice {
    pub invoice_date: NaiveDateTime,
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
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<vat_invoices::Model>> {
    Ok(VatInvoices::find_by_id(id).one(db).await?)
}

pub async fn find_by_invoice_number(
    db: &DatabaseConnection,
    invoice_number: &str,
) -> Result<Option<vat_invoices::Model>> {
    Ok(VatInvoices::find()
        .filter(vat_invoices::Column::InvoiceNumber.eq(invoice_number))
        .one(db)
        .await?)
}

pub async fn find_by_order_id(
    db: &DatabaseConnection,
    order_id: &str,
) -> Result<Option<vat_invoices::Model>> {
    Ok(VatInvoices::find()
        .filter(vat_invoices::Column::OrderId.eq(order_id))
        .one(db)
        .await?)
}

/// Insert a new Pending invoice, assigning the next local invoice number.
pub async fn insert_pending(
    db: &DatabaseConnection,
    new: NewInvoice,
) -> Result<vat_invoices::Model> {
    let last = VatInvoices::find()
        .order_by(vat_invoices::Column::Id, Order::Desc)
        .one(db)
        .await?;
    let next_seq = last.map(|m| m.id + 1).unwrap_or(1);
    let invoice_number = format!("VATINV-{:05}", next_seq);

    let model = vat_invoices::ActiveModel {
        invoice_number: Set(invoice_number),
        invoice_date: Set(new.invoice_date),
        order_id: Set(new.order_id),
        customer_id: Set(new.customer_id),
        retailer_number: Set(new.retailer_number),
        branch: Set(new.branch),
        service_type_code: Set(new.service_type_code),
        zone_id: Set(new.zone_id),
        division_id: Set(new.division_id),
        circle_id: Set(new.circle_id),
        txn_amount: Set(new.txn_amount),
        total_sd_percentage: Set(new.total_sd_percentage),
        total_sd_amount: Set(new.total_sd_amount),
        total_discount_amount: Set(new.total_discount_amount),
        total_service_charges_amount: Set(new.total_service_charges_amount),
        total_amount: Set(new.total_amount),
        payment_method: Set(new.payment_method),
        status: Set(InvoiceStatus::Pending),
        created_at: Set(Utc::now().naive_utc()),
        updated_at: Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(model)
}

/// All invoices still owed to the authority, oldest first so retries of
/// old failures precede fresh submissions and the order is deterministic.
pub async fn pending_and_failed(db: &DatabaseConnection) -> Result<Vec<vat_invoices::Model>> {
    Ok(VatInvoices::find()
        .filter(
            vat_invoices::Column::Status
                .is_in([InvoiceStatus::Pending, InvoiceStatus::Failed]),
        )
        .order_by(vat_invoices::Column::CreatedAt, Order::Asc)
        .order_by(vat_invoices::Column::Id, Order::Asc)
        .all(db)
        .await?)
}

/// Raw authority replies are audit data: every attempt appends, nothing
/// is overwritten.
fn audit_log(existing: &Option<String>, raw: &str) -> String {
    let stamp = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S");
    match existing {
        Some(log) if !log.is_empty() => format!("{}\n[{}] {}", log, stamp, raw),
        _ => format!("[{}] {}", stamp, raw),
    }
}

pub async fn mark_synced(
    db: &DatabaseConnection,
    invoice: vat_invoices::Model,
    challan_id: String,
    raw_response: String,
) -> Result<vat_invoices::Model> {
    let log = audit_log(&invoice.raw_response, &raw_response);
    let mut active = invoice.into_active_model();
    active.status = Set(InvoiceStatus::Synced);
    active.challan_id = Set(Some(challan_id));
    active.raw_response = Set(Some(log));
    active.synced_at = Set(Some(Utc::now().naive_utc()));
    active.updated_at = Set(Some(Utc::now().naive_utc()));
    Ok(active.update(db).await?)
}

pub async fn mark_failed(
    db: &DatabaseConnection,
    invoice: vat_invoices::Model,
    raw_response: String,
) -> Result<vat_invoices::Model> {
    let log = audit_log(&invoice.raw_response, &raw_response);
    let mut active = invoice.into_active_model();
    active.status = Set(InvoiceStatus::Failed);
    active.raw_response = Set(Some(log));
    active.updated_at = Set(Some(Utc::now().naive_utc()));
    Ok(active.update(db).await?)
}

/// Record a return against a synced invoice. The original VAT amount
/// column is left untouched; only the cumulative returned amount and the
/// status move.
pub async fn mark_returned(
    db: &DatabaseConnection,
    invoice: vat_invoices::Model,
    returned_amount: Decimal,
    full_return: bool,
    return_invoice_no: String,
    raw_response: String,
) -> Result<vat_invoices::Model> {
    let status = if full_return {
        InvoiceStatus::Return
    } else {
        InvoiceStatus::PartlyReturn
    };

    let log = audit_log(&invoice.raw_response, &raw_response);
    let mut active = invoice.into_active_model();
    active.status = Set(status);
    active.returned_amount = Set(Some(returned_amount));
    active.return_invoice_no = Set(Some(return_invoice_no));
    active.raw_response = Set(Some(log));
    active.updated_at = Set(Some(Utc::now().naive_utc()));
    Ok(active.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_log_appends_instead_of_overwriting() {
        let first = audit_log(&None, "rejected: bad retailer");
        assert!(first.contains("rejected: bad retailer"));

        let second = audit_log(&Some(first.clone()), "challan issued");
        assert!(second.contains("rejected: bad retailer"));
        assert!(second.contains("challan issued"));
        assert!(second.starts_with(&first));
    }
}
