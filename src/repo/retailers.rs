//! Persistence for retailer and branch registrations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

use crate::entities::{prelude::*, retailer_branches, retailer_registrations};
use crate::errors::Result;

pub struct NewRetailer {
    pub business_name: String,
    pub owner_name: String,
    pub nid_number: String,
    pub bin_number: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub zone_id: String,
    pub division_id: String,
    pub circle_id: String,
    pub commission_rate_id: String,
    pub service_types: Vec<String>,
}

pub async fn find_retailer(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<retailer_registrations::Model>> {
    Ok(RetailerRegistrations::find_by_id(id).one(db).await?)
}

pub async fn insert_retailer(
    db: &DatabaseConnection,
    new: NewRetailer,
) -> Result<retailer_registrations::Model> {
    let model = retailer_registrations::ActiveModel {
        business_name: Set(new.business_name),
        owner_name: Set(new.owner_name),
        nid_number: Set(new.nid_number),
        bin_number: Set(new.bin_number),
        phone: Set(new.phone),
        email: Set(new.email),
        address: Set(new.address),
        zone_id: Set(new.zone_id),
        division_id: Set(new.division_id),
        circle_id: Set(new.circle_id),
        commission_rate_id: Set(new.commission_rate_id),
        service_types: Set(serde_json::json!(new.service_types)),
        created_at: Set(Utc::now().naive_utc()),
        updated_at: Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(model)
}

/// Store the authority's registration outcome. Called both for fresh
/// registrations and for "already exists" replies, which carry the
/// existing retailer number.
pub async fn store_registration_result(
    db: &DatabaseConnection,
    retailer: retailer_registrations::Model,
    retailer_number: Option<String>,
    message: String,
    raw_response: String,
) -> Result<retailer_registrations::Model> {
    let mut active = retailer.into_active_model();
    if retailer_number.is_some() {
        active.retailer_number = Set(retailer_number);
    }
    active.registration_message = Set(Some(message));
    active.last_response = Set(Some(raw_response));
    active.updated_at = Set(Some(Utc::now().naive_utc()));
    Ok(active.update(db).await?)
}

/// Record the remote file URL for an uploaded document.
pub async fn store_document_url(
    db: &DatabaseConnection,
    retailer: retailer_registrations::Model,
    document_kind: &str,
    file_url: Option<String>,
) -> Result<retailer_registrations::Model> {
    let mut active = retailer.into_active_model();
    match document_kind {
        "nid" => active.nid_document_url = Set(file_url),
        "trade_license" => active.trade_license_url = Set(file_url),
        "tin_certificate" => active.tin_certificate_url = Set(file_url),
        _ => {}
    }
    active.updated_at = Set(Some(Utc::now().naive_utc()));
    Ok(active.update(db).await?)
}

pub struct NewBranch {
    pub retailer_id: i32,
    pub branch_name: String,
    pub address: String,
    pub phone: Option<String>,
}

pub async fn find_branch(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<retailer_branches::Model>> {
    Ok(RetailerBranches::find_by_id(id).one(db).await?)
}

pub async fn branches_of(
    db: &DatabaseConnection,
    retailer_id: i32,
) -> Result<Vec<retailer_branches::Model>> {
    Ok(RetailerBranches::find()
        .filter(retailer_branches::Column::RetailerId.eq(retailer_id))
        .all(db)
        .await?)
}

pub async fn insert_branch(
    db: &DatabaseConnection,
    new: NewBranch,
) -> Result<retailer_branches::Model> {
    let model = retailer_branches::ActiveModel {
        retailer_id: Set(new.retailer_id),
        branch_name: Set(new.branch_name),
        address: Set(new.address),
        phone: Set(new.phone),
        created_at: Set(Utc::now().naive_utc()),
        updated_at: Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(model)
}

pub async fn store_branch_result(
    db: &DatabaseConnection,
    branch: retailer_branches::Model,
    branch_number: Option<String>,
    message: String,
    raw_response: String,
) -> Result<retailer_branches::Model> {
    let mut active = branch.into_active_model();
    if branch_number.is_some() {
        active.branch_number = Set(branch_number);
    }
    active.registration_message = Set(Some(message));
    active.last_response = Set(Some(raw_response));
    active.updated_at = Set(Some(Utc::now().naive_utc()));
    Ok(active.update(db).await?)
}
