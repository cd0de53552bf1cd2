//! Retailer and branch registration against the authority.
//!
//! A remote "already exists" reply is a business success, not an error:
//! the message and any identifier it carries are stored on the record.

use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::json;

use crate::entities::{retailer_branches, retailer_registrations};
use crate::errors::{IntegrationError, Result};
use crate::repo::master_data;
use crate::repo::retailers as repo;
use crate::services::authority::AuthorityClient;
use crate::services::jurisdiction::{self, Selection};
use crate::services::token::TokenManager;

/// Document categories accepted by the authority upload endpoint.
pub const DOCUMENT_KINDS: &[&str] = &["nid", "trade_license", "tin_certificate"];

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutcome {
    pub remote_id: Option<String>,
    pub message: String,
    pub already_exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub status: String,
    pub file_url: Option<String>,
}

/// Validate the retailer's jurisdiction selections against synced master
/// data and submit the registration.
pub async fn register_retailer(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    retailer_id: i32,
) -> Result<(retailer_registrations::Model, RegistrationOutcome)> {
    let retailer = repo::find_retailer(db, retailer_id)
        .await?
        .ok_or_else(|| IntegrationError::NotFound(format!("retailer {}", retailer_id)))?;

    validate_selection(db, &retailer).await?;

    let payload = json!({
        "business_name": retailer.business_name,
        "owner_name": retailer.owner_name,
        "nid_number": retailer.nid_number,
        "bin_number": retailer.bin_number,
        "phone": retailer.phone,
        "email": retailer.email,
        "address": retailer.address,
        "zone_id": retailer.zone_id,
        "division_id": retailer.division_id,
        "circle_id": retailer.circle_id,
        "vat_commissionrate_id": retailer.commission_rate_id,
        "service_types": retailer.service_types,
    });

    let reply = match tokens
        .with_auth_retry(|session| {
            let payload = &payload;
            async move { authority.register_retailer(&session, payload).await }
        })
        .await
    {
        Ok(reply) => reply,
        Err(IntegrationError::RemoteValidation(msg)) => {
            // Keep the rejection on the record for diagnosis, then
            // surface it verbatim.
            repo::store_registration_result(
                db,
                retailer,
                None,
                "registration rejected".to_string(),
                msg.clone(),
            )
            .await?;
            return Err(IntegrationError::RemoteValidation(msg));
        }
        Err(e) => return Err(e),
    };

    let already_exists = reply_means_already_exists(&reply.status, &reply.message);
    let raw = serde_json::to_string(&reply).unwrap_or_default();
    let updated = repo::store_registration_result(
        db,
        retailer,
        reply.retailer_number.clone(),
        reply.message.clone(),
        raw,
    )
    .await?;

    if already_exists {
        tracing::info!(
            "retailer {} already registered with authority as {:?}",
            retailer_id,
            reply.retailer_number
        );
    }

    Ok((
        updated,
        RegistrationOutcome {
            remote_id: reply.retailer_number,
            message: reply.message,
            already_exists,
        },
    ))
}

/// Register an additional outlet under an already-registered retailer.
pub async fn register_branch(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    branch_id: i32,
) -> Result<(retailer_branches::Model, RegistrationOutcome)> {
    let branch = repo::find_branch(db, branch_id)
        .await?
        .ok_or_else(|| IntegrationError::NotFound(format!("branch {}", branch_id)))?;

    let retailer = repo::find_retailer(db, branch.retailer_id)
        .await?
        .ok_or_else(|| IntegrationError::NotFound(format!("retailer {}", branch.retailer_id)))?;

    let retailer_number = retailer.retailer_number.ok_or_else(|| {
        IntegrationError::Validation(format!(
            "retailer {} has no remote retailer number yet; register it before its branches",
            retailer.id
        ))
    })?;

    let payload = json!({
        "retailer_number": retailer_number,
        "branch_name": branch.branch_name,
        "address": branch.address,
        "phone": branch.phone,
    });

    let reply = tokens
        .with_auth_retry(|session| {
            let payload = &payload;
            async move { authority.register_branch(&session, payload).await }
        })
        .await?;

    let already_exists = reply_means_already_exists(&reply.status, &reply.message);
    let raw = serde_json::to_string(&reply).unwrap_or_default();
    let updated = repo::store_branch_result(
        db,
        branch,
        reply.retailer_number.clone(),
        reply.message.clone(),
        raw,
    )
    .await?;

    Ok((
        updated,
        RegistrationOutcome {
            remote_id: reply.retailer_number,
            message: reply.message,
            already_exists,
        },
    ))
}

/// Re-submit a previously uploaded local file as a multipart attachment
/// under the given document category. Registration must precede this.
pub async fn upload_file(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    retailer_id: i32,
    file_path: &str,
    document_kind: &str,
) -> Result<UploadOutcome> {
    if !DOCUMENT_KINDS.contains(&document_kind) {
        return Err(IntegrationError::Validation(format!(
            "unknown document category '{}'; expected one of {:?}",
            document_kind, DOCUMENT_KINDS
        )));
    }

    let retailer = repo::find_retailer(db, retailer_id)
        .await?
        .ok_or_else(|| IntegrationError::NotFound(format!("retailer {}", retailer_id)))?;

    let retailer_number = retailer.retailer_number.clone().ok_or_else(|| {
        IntegrationError::Validation(format!(
            "retailer {} has no remote retailer number yet; register it before uploading documents",
            retailer.id
        ))
    })?;

    let bytes = tokio::fs::read(file_path).await?;
    let file_name = std::path::Path::new(file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    let reply = tokens
        .with_auth_retry(|session| {
            let retailer_number = &retailer_number;
            let file_name = &file_name;
            let bytes = &bytes;
            async move {
                authority
                    .upload_document(
                        &session,
                        retailer_number,
                        document_kind,
                        file_name,
                        bytes.clone(),
                    )
                    .await
            }
        })
        .await?;

    repo::store_document_url(db, retailer, document_kind, reply.file_url.clone()).await?;

    Ok(UploadOutcome {
        status: reply.status,
        file_url: reply.file_url,
    })
}

async fn validate_selection(
    db: &DatabaseConnection,
    retailer: &retailer_registrations::Model,
) -> Result<()> {
    let selection = Selection {
        zone_id: &retailer.zone_id,
        division_id: &retailer.division_id,
        circle_id: &retailer.circle_id,
    };

    master_data::find_zone(db, &retailer.zone_id)
        .await?
        .ok_or_else(|| {
            IntegrationError::Validation(format!("unknown zone {}", retailer.zone_id))
        })?;
    let division = master_data::find_division(db, &retailer.division_id)
        .await?
        .ok_or_else(|| {
            IntegrationError::Validation(format!("unknown division {}", retailer.division_id))
        })?;
    let circle = master_data::find_circle(db, &retailer.circle_id)
        .await?
        .ok_or_else(|| {
            IntegrationError::Validation(format!("unknown circle {}", retailer.circle_id))
        })?;

    jurisdiction::validate_hierarchy(&selection, &division, &circle)
        .map_err(IntegrationError::Validation)?;

    master_data::find_commission_rate(db, &retailer.commission_rate_id)
        .await?
        .ok_or_else(|| {
            IntegrationError::Validation(format!(
                "unknown commission rate {}",
                retailer.commission_rate_id
            ))
        })?;

    Ok(())
}

/// The authority signals an existing registration either through the
/// status field or in prose; both count as success.
fn reply_means_already_exists(status: &str, message: &str) -> bool {
    status.eq_ignore_ascii_case("exists")
        || message.to_ascii_lowercase().contains("already exist")
}
