//! Master-data sync routines against the authority reference endpoints.
//!
//! All five routines share one protocol: token, fetch list, upsert each
//! row keyed by its remote identifier, count. A malformed row is logged
//! and skipped, never fails the batch, so re-invocation (manual or
//! scheduled) is always safe.

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;
use crate::repo::master_data as repo;
use crate::repo::Upserted;
use crate::services::authority::AuthorityClient;
use crate::services::token::TokenManager;

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct SyncOutcome {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

impl SyncOutcome {
    fn tally(&mut self, upserted: Upserted) {
        match upserted {
            Upserted::Created => self.created += 1,
            Upserted::Updated => self.updated += 1,
            Upserted::Unchanged => {}
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteZone {
    zone_id: String,
    zone_name: String,
}

#[derive(Debug, Deserialize)]
struct RemoteDivision {
    division_id: String,
    division_name: String,
    zone_id: String,
}

#[derive(Debug, Deserialize)]
struct RemoteCircle {
    circle_id: String,
    circle_name: String,
    division_id: String,
    #[serde(default)]
    zone_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteServiceType {
    service_type_code: String,
    service_type_name: String,
}

#[derive(Debug, Deserialize)]
struct RemoteCommissionRate {
    vat_commissionrate_id: String,
    rate: Decimal,
    zone_id: String,
    #[serde(default)]
    division_id: Option<String>,
    #[serde(default)]
    circle_id: Option<String>,
    #[serde(default)]
    service_type_code: Option<String>,
}

fn decode_row<T: serde::de::DeserializeOwned>(routine: &str, row: &Value) -> Option<T> {
    match serde_json::from_value(row.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!("[{}] skipping malformed row: {} ({})", routine, e, row);
            None
        }
    }
}

pub async fn sync_zones(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    force_refresh: bool,
) -> Result<SyncOutcome> {
    let rows = tokens
        .with_auth_retry(|session| async move {
            authority.fetch_zone_list(&session, force_refresh).await
        })
        .await?;

    let mut outcome = SyncOutcome::default();
    for row in &rows {
        let Some(zone) = decode_row::<RemoteZone>("sync_zones", row) else {
            outcome.skipped += 1;
            continue;
        };
        outcome.tally(repo::upsert_zone(db, &zone.zone_id, &zone.zone_name).await?);
    }

    tracing::info!(
        "zone sync complete: {} new, {} updated, {} skipped",
        outcome.created,
        outcome.updated,
        outcome.skipped
    );
    Ok(outcome)
}

pub async fn sync_divisions(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    vat_commissionrate_id: Option<&str>,
    force_refresh: bool,
) -> Result<SyncOutcome> {
    let rows = tokens
        .with_auth_retry(|session| async move {
            authority
                .fetch_division_list(&session, vat_commissionrate_id, force_refresh)
                .await
        })
        .await?;

    let mut outcome = SyncOutcome::default();
    for row in &rows {
        let Some(division) = decode_row::<RemoteDivision>("sync_divisions", row) else {
            outcome.skipped += 1;
            continue;
        };
        outcome.tally(
            repo::upsert_division(
                db,
                &division.division_id,
                &division.division_name,
                &division.zone_id,
            )
            .await?,
        );
    }

    tracing::info!(
        "division sync complete: {} new, {} updated, {} skipped",
        outcome.created,
        outcome.updated,
        outcome.skipped
    );
    Ok(outcome)
}

pub async fn sync_circles(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    division_id: Option<&str>,
    force_refresh: bool,
) -> Result<SyncOutcome> {
    let rows = tokens
        .with_auth_retry(|session| async move {
            authority
                .fetch_circle_list(&session, division_id, force_refresh)
                .await
        })
        .await?;

    let mut outcome = SyncOutcome::default();
    for row in &rows {
        let Some(circle) = decode_row::<RemoteCircle>("sync_circles", row) else {
            outcome.skipped += 1;
            continue;
        };

        // The payload carries the parent division; the zone linkage is
        // either explicit or resolved through the locally synced division.
        let zone_id = match circle.zone_id {
            Some(zone_id) => zone_id,
            None => match repo::find_division(db, &circle.division_id).await? {
                Some(division) => division.zone_id,
                None => {
                    tracing::warn!(
                        "[sync_circles] skipping circle {}: unknown parent division {}",
                        circle.circle_id,
                        circle.division_id
                    );
                    outcome.skipped += 1;
                    continue;
                }
            },
        };

        outcome.tally(
            repo::upsert_circle(
                db,
                &circle.circle_id,
                &circle.circle_name,
                &circle.division_id,
                &zone_id,
            )
            .await?,
        );
    }

    tracing::info!(
        "circle sync complete: {} new, {} updated, {} skipped",
        outcome.created,
        outcome.updated,
        outcome.skipped
    );
    Ok(outcome)
}

pub async fn sync_service_types(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    force_refresh: bool,
) -> Result<SyncOutcome> {
    let rows = tokens
        .with_auth_retry(|session| async move {
            authority.fetch_service_type_list(&session, force_refresh).await
        })
        .await?;

    let mut outcome = SyncOutcome::default();
    for row in &rows {
        let Some(service_type) = decode_row::<RemoteServiceType>("sync_service_types", row)
        else {
            outcome.skipped += 1;
            continue;
        };
        outcome.tally(
            repo::upsert_service_type(
                db,
                &service_type.service_type_code,
                &service_type.service_type_name,
            )
            .await?,
        );
    }

    tracing::info!(
        "service type sync complete: {} new, {} updated, {} skipped",
        outcome.created,
        outcome.updated,
        outcome.skipped
    );
    Ok(outcome)
}

pub async fn sync_commission_rates(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
    zone_id: Option<&str>,
    force_refresh: bool,
) -> Result<SyncOutcome> {
    let rows = tokens
        .with_auth_retry(|session| async move {
            authority
                .fetch_commission_rate_list(&session, zone_id, force_refresh)
                .await
        })
        .await?;

    let mut outcome = SyncOutcome::default();
    for row in &rows {
        let Some(rate) = decode_row::<RemoteCommissionRate>("sync_commission_rates", row) else {
            outcome.skipped += 1;
            continue;
        };
        outcome.tally(
            repo::upsert_commission_rate(
                db,
                repo::CommissionRateRecord {
                    commission_rate_id: rate.vat_commissionrate_id,
                    rate: rate.rate,
                    zone_id: rate.zone_id,
                    division_id: rate.division_id,
                    circle_id: rate.circle_id,
                    service_type_code: rate.service_type_code,
                },
            )
            .await?,
        );
    }

    tracing::info!(
        "commission rate sync complete: {} new, {} updated, {} skipped",
        outcome.created,
        outcome.updated,
        outcome.skipped
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_zone_row_is_skipped_not_fatal() {
        let row = json!({"zone_name": "Dhaka North"});
        assert!(decode_row::<RemoteZone>("sync_zones", &row).is_none());

        let row = json!({"zone_id": "Z-01", "zone_name": "Dhaka North"});
        let zone = decode_row::<RemoteZone>("sync_zones", &row).unwrap();
        assert_eq!(zone.zone_id, "Z-01");
    }

    #[test]
    fn commission_rate_row_decodes_scope_fields() {
        let row = json!({
            "vat_commissionrate_id": "CR-7",
            "rate": 7.5,
            "zone_id": "Z-01",
            "division_id": "D-02",
            "service_type_code": "ST-RESTAURANT"
        });
        let rate = decode_row::<RemoteCommissionRate>("sync_commission_rates", &row).unwrap();
        assert_eq!(rate.vat_commissionrate_id, "CR-7");
        assert_eq!(rate.zone_id, "Z-01");
        assert_eq!(rate.circle_id, None);
        assert_eq!(rate.service_type_code.as_deref(), Some("ST-RESTAURANT"));
    }
}
