//! Upserts and lookups for the mirrored master-data tables.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

use crate::entities::{circles, commission_rates, divisions, prelude::*, service_types, zones};
use crate::errors::Result;
use crate::repo::Upserted;

pub async fn find_zone(db: &DatabaseConnection, zone_id: &str) -> Result<Option<zones::Model>> {
    Ok(Zones::find()
        .filter(zones::Column::ZoneId.eq(zone_id))
        .one(db)
        .await?)
}

pub async fn upsert_zone(db: &DatabaseConnection, zone_id: &str, name: &str) -> Result<Upserted> {
    match find_zone(db, zone_id).await? {
        Some(existing) => {
            if existing.name == name {
                return Ok(Upserted::Unchanged);
            }
            let mut active = existing.into_active_model();
            active.name = Set(name.to_string());
            active.updated_at = Set(Some(Utc::now().naive_utc()));
            active.update(db).await?;
            Ok(Upserted::Updated)
        }
        None => {
            zones::ActiveModel {
                zone_id: Set(zone_id.to_string()),
                name: Set(name.to_string()),
                updated_at: Set(Some(Utc::now().naive_utc())),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(Upserted::Created)
        }
    }
}

pub async fn find_division(
    db: &DatabaseConnection,
    division_id: &str,
) -> Result<Option<divisions::Model>> {
    Ok(Divisions::find()
        .filter(divisions::Column::DivisionId.eq(division_id))
        .one(db)
        .await?)
}

pub async fn upsert_division(
    db: &DatabaseConnection,
    division_id: &str,
    name: &str,
    zone_id: &str,
) -> Result<Upserted> {
    match find_division(db, division_id).await? {
        Some(existing) => {
            if existing.name == name && existing.zone_id == zone_id {
                return Ok(Upserted::Unchanged);
            }
            let mut active = existing.into_active_model();
            active.name = Set(name.to_string());
            active.zone_id = Set(zone_id.to_string());
            active.updated_at = Set(Some(Utc::now().naive_utc()));
            active.update(db).await?;
            Ok(Upserted::Updated)
        }
        None => {
            divisions::ActiveModel {
                division_id: Set(division_id.to_string()),
                name: Set(name.to_string()),
                zone_id: Set(zone_id.to_string()),
                updated_at: Set(Some(Utc::now().naive_utc())),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(Upserted::Created)
        }
    }
}

pub async fn find_circle(
    db: &DatabaseConnection,
    circle_id: &str,
) -> Result<Option<circles::Model>> {
    Ok(Circles::find()
        .filter(circles::Column::CircleId.eq(circle_id))
        .one(db)
        .await?)
}

pub async fn upsert_circle(
    db: &DatabaseConnection,
    circle_id: &str,
    name: &str,
    division_id: &str,
    zone_id: &str,
) -> Result<Upserted> {
    match find_circle(db, circle_id).await? {
        Some(existing) => {
            if existing.name == name
                && existing.division_id == division_id
                && existing.zone_id == zone_id
            {
                return Ok(Upserted::Unchanged);
            }
            let mut active = existing.into_active_model();
            active.name = Set(name.to_string());
            active.division_id = Set(division_id.to_string());
            active.zone_id = Set(zone_id.to_string());
            active.updated_at = Set(Some(Utc::now().naive_utc()));
            active.update(db).await?;
            Ok(Upserted::Updated)
        }
        None => {
            circles::ActiveModel {
                circle_id: Set(circle_id.to_string()),
                name: Set(name.to_string()),
                division_id: Set(division_id.to_string()),
                zone_id: Set(zone_id.to_string()),
                updated_at: Set(Some(Utc::now().naive_utc())),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(Upserted::Created)
        }
    }
}

pub async fn find_service_type(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<service_types::Model>> {
    Ok(ServiceTypes::find()
        .filter(service_types::Column::ServiceTypeCode.eq(code))
        .one(db)
        .await?)
}

pub async fn upsert_service_type(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
) -> Result<Upserted> {
    match find_service_type(db, code).await? {
        Some(existing) => {
            if existing.name == name {
                return Ok(Upserted::Unchanged);
            }
            let mut active = existing.into_active_model();
            active.name = Set(name.to_string());
            active.updated_at = Set(Some(Utc::now().naive_utc()));
            active.update(db).await?;
            Ok(Upserted::Updated)
        }
        None => {
            service_types::ActiveModel {
                service_type_code: Set(code.to_string()),
                name: Set(name.to_string()),
                updated_at: Set(Some(Utc::now().naive_utc())),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(Upserted::Created)
        }
    }
}

pub async fn find_commission_rate(
    db: &DatabaseConnection,
    commission_rate_id: &str,
) -> Result<Option<commission_rates::Model>> {
    Ok(CommissionRates::find()
        .filter(commission_rates::Column::CommissionRateId.eq(commission_rate_id))
        .one(db)
        .await?)
}

pub struct CommissionRateRecord {
    pub commission_rate_id: String,
    pub rate: Decimal,
    pub zone_id: String,
    pub division_id: Option<String>,
    pub circle_id: Option<String>,
    pub service_type_code: Option<String>,
}

pub async fn upsert_commission_rate(
    db: &DatabaseConnection,
    record: CommissionRateRecord,
) -> Result<Upserted> {
    match find_commission_rate(db, &record.commission_rate_id).await? {
        Some(existing) => {
            if existing.rate == record.rate
                && existing.zone_id == record.zone_id
                && existing.division_id == record.division_id
                && existing.circle_id == record.circle_id
                && existing.service_type_code == record.service_type_code
            {
                return Ok(Upserted::Unchanged);
            }
            let mut active = existing.into_active_model();
            active.rate = Set(record.rate);
            active.zone_id = Set(record.zone_id);
            active.division_id = Set(record.division_id);
            active.circle_id = Set(record.circle_id);
            active.service_type_code = Set(record.service_type_code);
            active.updated_at = Set(Some(Utc::now().naive_utc()));
            active.update(db).await?;
            Ok(Upserted::Updated)
        }
        None => {
            commission_rates::ActiveModel {
                commission_rate_id: Set(record.commission_rate_id),
                rate: Set(record.rate),
                zone_id: Set(record.zone_id),
                division_id: Set(record.division_id),
                circle_id: Set(record.circle_id),
                service_type_code: Set(record.service_type_code),
                updated_at: Set(Some(Utc::now().naive_utc())),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(Upserted::Created)
        }
    }
}
