//! Retailer and branch registration endpoints.

use axum::extract::{Path, State};
use axum::Json;

use crate::errors::Result;
use crate::models::registration::{
    CreateBranchRequest, CreateRetailerRequest, RegisterResponse, UploadRequest, UploadResponse,
};
use crate::repo::retailers as repo;
use crate::services::registration;
use crate::AppState;

/// Create the retailer record and submit it to the authority.
pub async fn register_retailer(
    State(state): State<AppState>,
    Json(request): Json<CreateRetailerRequest>,
) -> Result<Json<RegisterResponse>> {
    let retailer = repo::insert_retailer(
        &state.db,
        repo::NewRetailer {
            business_name: request.business_name,
            owner_name: request.owner_name,
            nid_number: request.nid_number,
            bin_number: request.bin_number,
            phone: request.phone,
            email: request.email,
            address: request.address,
            zone_id: request.zone_id,
            division_id: request.division_id,
            circle_id: request.circle_id,
            commission_rate_id: request.commission_rate_id,
            service_types: request.service_types,
        },
    )
    .await?;

    let (updated, outcome) = registration::register_retailer(
        &state.db,
        &state.tokens,
        &state.authority,
        retailer.id,
    )
    .await?;

    Ok(Json(RegisterResponse {
        success: true,
        id: updated.id,
        remote_id: outcome.remote_id,
        message: outcome.message,
        already_exists: outcome.already_exists,
    }))
}

/// Create a branch under a registered retailer and submit it.
pub async fn register_branch(
    State(state): State<AppState>,
    Path(retailer_id): Path<i32>,
    Json(request): Json<CreateBranchRequest>,
) -> Result<Json<RegisterResponse>> {
    let branch = repo::insert_branch(
        &state.db,
        repo::NewBranch {
            retailer_id,
            branch_name: request.branch_name,
            address: request.address,
            phone: request.phone,
        },
    )
    .await?;

    let (updated, outcome) =
        registration::register_branch(&state.db, &state.tokens, &state.authority, branch.id)
            .await?;

    Ok(Json(RegisterResponse {
        success: true,
        id: updated.id,
        remote_id: outcome.remote_id,
        message: outcome.message,
        already_exists: outcome.already_exists,
    }))
}

/// Re-submit a locally stored document to the authority.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(retailer_id): Path<i32>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>> {
    let outcome = registration::upload_file(
        &state.db,
        &state.tokens,
        &state.authority,
        retailer_id,
        &request.file_path,
        &request.document_kind,
    )
    .await?;

    Ok(Json(UploadResponse {
        success: true,
        status: outcome.status,
        file_url: outcome.file_url,
    }))
}
