// src/bin/sync_master_data.rs
//
// One-shot manual refresh of all authority master data.
// Usage: cargo run --bin sync_master_data

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;

use vschallan_backend::services::authority::AuthorityClient;
use vschallan_backend::services::master_data;
use vschallan_backend::services::token::TokenManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());

    println!("Syncing zones...");
    let zones = master_data::sync_zones(&db, &tokens, &authority, true).await?;
    println!("  {} new, {} updated, {} skipped", zones.created, zones.updated, zones.skipped);

    println!("Syncing commission rates...");
    let rates = master_data::sync_commission_rates(&db, &tokens, &authority, None, true).await?;
    println!("  {} new, {} updated, {} skipped", rates.created, rates.updated, rates.skipped);

    println!("Syncing divisions...");
    let divisions = master_data::sync_divisions(&db, &tokens, &authority, None, true).await?;
    println!(
        "  {} new, {} updated, {} skipped",
        divisions.created, divisions.updated, divisions.skipped
    );

    println!("Syncing circles...");
    let circles = master_data::sync_circles(&db, &tokens, &authority, None, true).await?;
    println!(
        "  {} new, {} updated, {} skipped",
        circles.created, circles.updated, circles.skipped
    );

    println!("Syncing service types...");
    let services = master_data::sync_service_types(&db, &tokens, &authority, true).await?;
    println!(
        "  {} new, {} updated, {} skipped",
        services.created, services.updated, services.skipped
    );

    println!("\nMaster data sync complete.");
    Ok(())
}
