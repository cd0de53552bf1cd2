pub use super::circles::Entity as Circles;
pub use super::commission_rates::Entity as CommissionRates;
pub use super::divisions::Entity as Divisions;
pub use super::retailer_branches::Entity as RetailerBranches;
pub use super::retailer_registrations::Entity as RetailerRegistrations;
pub use super::service_types::Entity as ServiceTypes;
pub use super::sync_status::Entity as SyncStatus;
pub use super::vat_invoices::Entity as VatInvoices;
pub use super::vendor_configuration::Entity as VendorConfiguration;
pub use super::zones::Entity as Zones;
