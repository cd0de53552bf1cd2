//! Read-only reporting over persisted invoice records.
//!
//! No remote calls happen here; "sync now" and "download schallan" are
//! separate operations that delegate to the invoice service.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::entities::vat_invoices::{self, InvoiceStatus};
use crate::entities::prelude::*;
use crate::errors::Result;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct InvoiceReportFilters {
    pub from_date: Option<NaiveDateTime>,
    pub to_date: Option<NaiveDateTime>,
    pub status: Option<InvoiceStatus>,
    pub invoice_number: Option<String>,
    pub order_id: Option<String>,
    pub branch: Option<String>,
    pub service_type_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSummary {
    pub total_invoices: u64,
    pub pending: u64,
    pub synced: u64,
    pub failed: u64,
    pub returned: u64,
    pub partly_returned: u64,
    pub total_txn_amount: Decimal,
    pub total_sales: Decimal,
    pub total_vat_amount: Decimal,
    pub total_discount: Decimal,
    pub unique_customers: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesRollupRow {
    pub key: String,
    pub invoice_count: u64,
    pub txn_amount: Decimal,
    pub vat_amount: Decimal,
    pub total_amount: Decimal,
}

/// Chart-ready label/value series for the report UI.
#[derive(Debug, Clone, Serialize)]
pub struct SalesChart {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

/// Filtered invoice rows, newest first.
pub async fn invoice_report(
    db: &DatabaseConnection,
    filters: &InvoiceReportFilters,
) -> Result<Vec<vat_invoices::Model>> {
    let mut condition = Condition::all();
    if let Some(from) = filters.from_date {
        condition = condition.add(vat_invoices::Column::InvoiceDate.gte(from));
    }
    if let Some(to) = filters.to_date {
        condition = condition.add(vat_invoices::Column::InvoiceDate.lte(to));
    }
    if let Some(status) = filters.status {
        condition = condition.add(vat_invoices::Column::Status.eq(status));
    }
    if let Some(invoice_number) = &filters.invoice_number {
        condition =
            condition.add(vat_invoices::Column::InvoiceNumber.contains(invoice_number.as_str()));
    }
    if let Some(order_id) = &filters.order_id {
        condition = condition.add(vat_invoices::Column::OrderId.contains(order_id.as_str()));
    }
    if let Some(branch) = &filters.branch {
        condition = condition.add(vat_invoices::Column::Branch.eq(branch.as_str()));
    }
    if let Some(code) = &filters.service_type_code {
        condition = condition.add(vat_invoices::Column::ServiceTypeCode.eq(code.as_str()));
    }

    Ok(VatInvoices::find()
        .filter(condition)
        .order_by(vat_invoices::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?)
}

/// Aggregate totals over the filtered rows.
pub async fn invoice_summary(
    db: &DatabaseConnection,
    filters: &InvoiceReportFilters,
) -> Result<InvoiceSummary> {
    let rows = invoice_report(db, filters).await?;
    Ok(summarize(&rows))
}

pub fn summarize(rows: &[vat_invoices::Model]) -> InvoiceSummary {
    let mut summary = InvoiceSummary {
        total_invoices: rows.len() as u64,
        pending: 0,
        synced: 0,
        failed: 0,
        returned: 0,
        partly_returned: 0,
        total_txn_amount: Decimal::ZERO,
        total_sales: Decimal::ZERO,
        total_vat_amount: Decimal::ZERO,
        total_discount: Decimal::ZERO,
        unique_customers: 0,
    };

    let mut customers = HashSet::new();
    for row in rows {
        match row.status {
            InvoiceStatus::Pending => summary.pending += 1,
            InvoiceStatus::Synced => summary.synced += 1,
            InvoiceStatus::Failed => summary.failed += 1,
            InvoiceStatus::Return => summary.returned += 1,
            InvoiceStatus::PartlyReturn => summary.partly_returned += 1,
        }
        summary.total_txn_amount += row.txn_amount;
        summary.total_sales += row.total_amount;
        summary.total_vat_amount += row.total_sd_amount;
        summary.total_discount += row.total_discount_amount;
        if let Some(customer) = &row.customer_id {
            customers.insert(customer.clone());
        }
    }
    summary.unique_customers = customers.len() as u64;
    summary
}

/// Per-branch rollup of filtered invoices.
pub async fn branch_wise_sales(
    db: &DatabaseConnection,
    filters: &InvoiceReportFilters,
) -> Result<Vec<SalesRollupRow>> {
    let rows = invoice_report(db, filters).await?;
    Ok(rollup(&rows, |row| {
        row.branch.clone().unwrap_or_else(|| "Unassigned".to_string())
    }))
}

/// Per-service-type rollup plus a chart series of transaction amounts.
pub async fn service_type_wise_sales(
    db: &DatabaseConnection,
    filters: &InvoiceReportFilters,
) -> Result<(Vec<SalesRollupRow>, SalesChart)> {
    let rows = invoice_report(db, filters).await?;
    let rollup = rollup(&rows, |row| row.service_type_code.clone());
    let chart = SalesChart {
        labels: rollup.iter().map(|r| r.key.clone()).collect(),
        values: rollup.iter().map(|r| r.txn_amount).collect(),
    };
    Ok((rollup, chart))
}

fn rollup<F>(rows: &[vat_invoices::Model], key_of: F) -> Vec<SalesRollupRow>
where
    F: Fn(&vat_invoices::Model) -> String,
{
    let mut grouped: BTreeMap<String, SalesRollupRow> = BTreeMap::new();
    for row in rows {
        let key = key_of(row);
        let entry = grouped.entry(key.clone()).or_insert_with(|| SalesRollupRow {
            key,
            invoice_count: 0,
            txn_amount: Decimal::ZERO,
            vat_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
        });
        entry.invoice_count += 1;
        entry.txn_amount += row.txn_amount;
        entry.vat_amount += row.total_sd_amount;
        entry.total_amount += row.total_amount;
    }
    grouped.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn row(
        status: InvoiceStatus,
        branch: &str,
        service: &str,
        txn: Decimal,
        sd: Decimal,
        customer: &str,
    ) -> vat_invoices::Model {
        vat_invoices::Model {
            id: 0,
            invoice_number: "VATINV-00000".to_string(),
            invoice_date: Utc::now().naive_utc(),
            order_id: "ORD".to_string(),
            customer_id: Some(customer.to_string()),
            retailer_number: "R-1".to_string(),
            branch: Some(branch.to_string()),
            service_type_code: service.to_string(),
            zone_id: "Z".to_string(),
            division_id: "D".to_string(),
            circle_id: "C".to_string(),
            txn_amount: txn,
            total_sd_percentage: dec!(5),
            total_sd_amount: sd,
            total_discount_amount: dec!(10),
            total_service_charges_amount: dec!(0),
            total_amount: txn + sd - dec!(10),
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
    fn summary_counts_statuses_and_sums() {
        let rows = vec![
            row(InvoiceStatus::Pending, "A", "S1", dec!(1200), dec!(60), "CU-1"),
            row(InvoiceStatus::Synced, "B", "S2", dec!(1500), dec!(150), "CU-2"),
            row(InvoiceStatus::Failed, "A", "S1", dec!(800), dec!(40), "CU-1"),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.total_invoices, 3);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.synced, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_txn_amount, dec!(3500));
        assert_eq!(summary.total_vat_amount, dec!(250));
        assert_eq!(summary.unique_customers, 2);
    }

    #[test]
    fn rollup_groups_by_branch() {
        let rows = vec![
            row(InvoiceStatus::Synced, "A", "S1", dec!(100), dec!(5), "CU-1"),
            row(InvoiceStatus::Synced, "A", "S2", dec!(200), dec!(10), "CU-2"),
            row(InvoiceStatus::Synced, "B", "S1", dec!(300), dec!(15), "CU-3"),
        ];
        let rollup = rollup(&rows, |r| r.branch.clone().unwrap());
        assert_eq!(rollup.len(), 2);
        let a = rollup.iter().find(|r| r.key == "A").unwrap();
        assert_eq!(a.invoice_count, 2);
        assert_eq!(a.txn_amount, dec!(300));
        let b = rollup.iter().find(|r| r.key == "B").unwrap();
        assert_eq!(b.vat_amount, dec!(15));
    }
}
