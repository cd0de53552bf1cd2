//! VAT invoice lifecycle endpoints.

use axum::extract::{Path, State};
use axum::Json;

use crate::entities::vat_invoices::InvoiceStatus;
use crate::errors::Result;
use crate::models::invoice::{
    BatchSyncResponse, InvoiceResponse, SchallanResponse, SyncInvoiceResponse,
};
use crate::services::invoice::{self, PosTransaction, ReturnRequest};
use crate::AppState;

/// Record a finalized POS transaction as a Pending VAT invoice.
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(txn): Json<PosTransaction>,
) -> Result<Json<InvoiceResponse>> {
    let model =
        invoice::create_vat_invoice(&state.db, &state.tokens, &state.authority, txn).await?;
    Ok(Json(model.into()))
}

/// Submit the challan for one invoice ("sync now").
pub async fn sync_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i32>,
) -> Result<Json<SyncInvoiceResponse>> {
    let model =
        invoice::sync_vat_invoice(&state.db, &state.tokens, &state.authority, invoice_id).await?;

    let success = model.status == InvoiceStatus::Synced;
    let message = if success {
        format!("{} synced successfully", model.invoice_number)
    } else {
        model
            .raw_response
            .clone()
            .unwrap_or_else(|| format!("{} failed to sync", model.invoice_number))
    };

    Ok(Json(SyncInvoiceResponse {
        success,
        status: model.status,
        challan_id: model.challan_id,
        message,
    }))
}

/// File a (partial) return against a synced invoice.
pub async fn return_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i32>,
    Json(request): Json<ReturnRequest>,
) -> Result<Json<InvoiceResponse>> {
    let model = invoice::return_vat_invoice(
        &state.db,
        &state.tokens,
        &state.authority,
        invoice_id,
        request,
    )
    .await?;
    Ok(Json(model.into()))
}

/// Batch-sync every Pending and Failed invoice.
pub async fn sync_all_invoices(
    State(state): State<AppState>,
) -> Result<Json<BatchSyncResponse>> {
    let outcome =
        invoice::auto_sync_vat_invoices(&state.db, &state.tokens, &state.authority).await?;
    Ok(Json(outcome.into()))
}

/// Download the rendered schallan for a submitted invoice.
pub async fn download_schallan(
    State(state): State<AppState>,
    Path(invoice_id): Path<i32>,
) -> Result<Json<SchallanResponse>> {
    let file_path =
        invoice::download_schallan(&state.db, &state.tokens, &state.authority, invoice_id).await?;
    Ok(Json(SchallanResponse {
        success: true,
        file_path,
    }))
}
