use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entities::vat_invoices::InvoiceStatus;
use crate::models::invoice::InvoiceResponse;
use crate::services::reporting::{
    InvoiceReportFilters, InvoiceSummary, SalesChart, SalesRollupRow,
};

/// Query parameters for the report endpoints. Dates are inclusive
/// calendar days.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub invoice_number: Option<String>,
    pub order_id: Option<String>,
    pub branch: Option<String>,
    pub service_type: Option<String>,
}

impl ReportQuery {
    pub fn into_filters(self) -> InvoiceReportFilters {
        InvoiceReportFilters {
            from_date: self.from_date.and_then(day_start),
            to_date: self.to_date.and_then(day_end),
            status: self.status,
            invoice_number: self.invoice_number,
            order_id: self.order_id,
            branch: self.branch,
            service_type_code: self.service_type,
        }
    }
}

fn day_start(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn day_end(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(23, 59, 59)
}

#[derive(Debug, Serialize)]
pub struct InvoiceReportResponse {
    pub rows: Vec<InvoiceResponse>,
    pub summary: InvoiceSummary,
}

#[derive(Debug, Serialize)]
pub struct SalesRollupResponse {
    pub rows: Vec<SalesRollupRow>,
}

#[derive(Debug, Serialize)]
pub struct ServiceTypeSalesResponse {
    pub rows: Vec<SalesRollupRow>,
    pub chart: SalesChart,
}
