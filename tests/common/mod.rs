#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use vschallan_backend::entities::vendor_configuration::{self, SyncSchedule};
use vschallan_backend::entities::{circles, commission_rates, divisions, service_types, zones};

/// Fresh in-memory SQLite database with the real migrations applied.
/// One connection only: every query must see the same in-memory file.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Vendor configuration pointing at a mock authority, with a stored
/// token that is still valid for an hour.
pub async fn seed_vendor_config(db: &DatabaseConnection, base_url: &str) {
    seed_vendor_config_with(db, base_url, Some("test-token"), 3600, SyncSchedule::Scheduled)
        .await;
}

pub async fn seed_vendor_config_with(
    db: &DatabaseConnection,
    base_url: &str,
    access_token: Option<&str>,
    expires_in_secs: i64,
    sync_schedule: SyncSchedule,
) {
    vendor_configuration::ActiveModel {
        base_url: Set(base_url.to_string()),
        client_id: Set("test-client".to_string()),
        client_secret: Set("test-secret".to_string()),
        access_token: Set(access_token.map(String::from)),
        token_expiry: Set(access_token.map(|_| {
            Utc::now().naive_utc() + chrono::Duration::seconds(expires_in_secs)
        })),
        company_id: Set(Some("COMP-1".to_string())),
        disabled: Set(false),
        sync_schedule: Set(sync_schedule),
        updated_at: Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed vendor configuration");
}

/// A minimal consistent jurisdiction: zone Z-01 > division D-02 >
/// circle C-03, one zone-wide 5% commission rate, one service type.
pub async fn seed_master_data(db: &DatabaseConnection) {
    zones::ActiveModel {
        zone_id: Set("Z-01".to_string()),
        name: Set("Dhaka North".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed zone");

    divisions::ActiveModel {
        division_id: Set("D-02".to_string()),
        name: Set("Gulshan".to_string()),
        zone_id: Set("Z-01".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed division");

    circles::ActiveModel {
        circle_id: Set("C-03".to_string()),
        name: Set("Banani".to_string()),
        division_id: Set("D-02".to_string()),
        zone_id: Set("Z-01".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed circle");

    commission_rates::ActiveModel {
        commission_rate_id: Set("CR-1".to_string()),
        rate: Set(rust_decimal_macros::dec!(5)),
        zone_id: Set("Z-01".to_string()),
        division_id: Set(None),
        circle_id: Set(None),
        service_type_code: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed commission rate");

    service_types::ActiveModel {
        service_type_code: Set("ST-RESTAURANT".to_string()),
        name: Set("Restaurant".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed service type");
}

/// Expiry timestamp in the authority's format, `secs` from now.
pub fn authority_expiry(secs: i64) -> String {
    (Utc::now().naive_utc() + chrono::Duration::seconds(secs))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
