//! Read-only report endpoints over persisted invoice records.

use axum::extract::{Query, State};
use axum::Json;

use crate::errors::Result;
use crate::models::reports::{
    InvoiceReportResponse, ReportQuery, SalesRollupResponse, ServiceTypeSalesResponse,
};
use crate::services::reporting;
use crate::AppState;

pub async fn invoice_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<InvoiceReportResponse>> {
    let filters = query.into_filters();
    let rows = reporting::invoice_report(&state.db, &filters).await?;
    let summary = reporting::summarize(&rows);

    Ok(Json(InvoiceReportResponse {
        rows: rows.into_iter().map(Into::into).collect(),
        summary,
    }))
}

pub async fn branch_wise_sales(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<SalesRollupResponse>> {
    let filters = query.into_filters();
    let rows = reporting::branch_wise_sales(&state.db, &filters).await?;
    Ok(Json(SalesRollupResponse { rows }))
}

pub async fn service_type_wise_sales(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ServiceTypeSalesResponse>> {
    let filters = query.into_filters();
    let (rows, chart) = reporting::service_type_wise_sales(&state.db, &filters).await?;
    Ok(Json(ServiceTypeSalesResponse { rows, chart }))
}
