pub use sea_orm_migration::prelude::*;

mod m20260801_000001_create_vendor_configuration;
mod m20260801_000002_create_zones;
mod m20260801_000003_create_divisions;
mod m20260801_000004_create_circles;
mod m20260801_000005_create_service_types;
mod m20260801_000006_create_commission_rates;
mod m20260802_000001_create_retailer_registrations;
mod m20260802_000002_create_retailer_branches;
mod m20260803_000001_create_vat_invoices;
mod m20260803_000002_create_sync_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_vendor_configuration::Migration),
            Box::new(m20260801_000002_create_zones::Migration),
            Box::new(m20260801_000003_create_divisions::Migration),
            Box::new(m20260801_000004_create_circles::Migration),
            Box::new(m20260801_000005_create_service_types::Migration),
            Box::new(m20260801_000006_create_commission_rates::Migration),
            Box::new(m20260802_000001_create_retailer_registrations::Migration),
            Box::new(m20260802_000002_create_retailer_branches::Migration),
            Box::new(m20260803_000001_create_vat_invoices::Migration),
            Box::new(m20260803_000002_create_sync_status::Migration),
        ]
    }
}
