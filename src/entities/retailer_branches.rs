//! SeaORM Entity for retailer branch outlets

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "retailer_branches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Local id of the parent retailer registration
    pub retailer_id: i32,
    pub branch_name: String,
    pub address: String,
    pub phone: Option<String>,
    /// Assigned by the authority on branch registration
    pub branch_number: Option<String>,
    pub registration_message: Option<String>,
    pub last_response: Option<String>,
    pub created_at: DateTime,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::retailer_registrations::Entity",
        from = "Column::RetailerId",
        to = "super::retailer_registrations::Column::Id"
    )]
    Retailer,
}

impl Related<super::retailer_registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Retailer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
