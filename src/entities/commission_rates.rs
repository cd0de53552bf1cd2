//! SeaORM Entity for VAT commission rates
//!
//! A rate is scoped to a zone and optionally narrowed by division,
//! circle and service type. Rate resolution picks the most specific
//! row covering a transaction's jurisdiction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_rates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub commission_rate_id: String,
    /// Percentage, e.g. 7.5000
    pub rate: Decimal,
    pub zone_id: String,
    pub division_id: Option<String>,
    pub circle_id: Option<String>,
    pub service_type_code: Option<String>,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
