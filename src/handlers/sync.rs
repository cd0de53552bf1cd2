//! Master-data sync and token endpoints.

use axum::extract::{Query, State};
use axum::Json;

use crate::errors::Result;
use crate::models::sync::{SyncQuery, SyncResponse, TokenResponse};
use crate::services::master_data;
use crate::AppState;

pub async fn sync_zones(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
) -> Result<Json<SyncResponse>> {
    let outcome = master_data::sync_zones(
        &state.db,
        &state.tokens,
        &state.authority,
        query.force_refresh,
    )
    .await?;
    Ok(Json(SyncResponse::from_outcome("zone", outcome)))
}

pub async fn sync_divisions(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
) -> Result<Json<SyncResponse>> {
    let outcome = master_data::sync_divisions(
        &state.db,
        &state.tokens,
        &state.authority,
        query.vat_commissionrate_id.as_deref(),
        query.force_refresh,
    )
    .await?;
    Ok(Json(SyncResponse::from_outcome("division", outcome)))
}

pub async fn sync_circles(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
) -> Result<Json<SyncResponse>> {
    let outcome = master_data::sync_circles(
        &state.db,
        &state.tokens,
        &state.authority,
        query.division_id.as_deref(),
        query.force_refresh,
    )
    .await?;
    Ok(Json(SyncResponse::from_outcome("circle", outcome)))
}

pub async fn sync_commission_rates(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
) -> Result<Json<SyncResponse>> {
    let outcome = master_data::sync_commission_rates(
        &state.db,
        &state.tokens,
        &state.authority,
        query.zone_id.as_deref(),
        query.force_refresh,
    )
    .await?;
    Ok(Json(SyncResponse::from_outcome("commission rate", outcome)))
}

pub async fn sync_service_types(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
) -> Result<Json<SyncResponse>> {
    let outcome = master_data::sync_service_types(
        &state.db,
        &state.tokens,
        &state.authority,
        query.force_refresh,
    )
    .await?;
    Ok(Json(SyncResponse::from_outcome("service type", outcome)))
}

/// Obtain (or refresh) the vendor access token on operator demand.
pub async fn fetch_vendor_token(State(state): State<AppState>) -> Result<Json<TokenResponse>> {
    let session = state.tokens.get_valid_token(false).await?;
    Ok(Json(TokenResponse {
        success: true,
        message: "access token is valid".to_string(),
        company_id: session.company_id,
    }))
}
