//! SeaORM Entity for retailer registrations
//!
//! `retailer_number` is assigned by the authority; a row with it unset
//! has not completed registration yet. `last_response` keeps the raw
//! remote reply for audit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "retailer_registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
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
    /// Selected service-type codes, serialized as a JSON array
    #[sea_orm(column_type = "Json")]
    pub service_types: Json,
    pub retailer_number: Option<String>,
    pub registration_message: Option<String>,
    pub nid_document_url: Option<String>,
    pub trade_license_url: Option<String>,
    pub tin_certificate_url: Option<String>,
    pub last_response: Option<String>,
    pub created_at: DateTime,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::retailer_branches::Entity")]
    Branches,
}

impl Related<super::retailer_branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
