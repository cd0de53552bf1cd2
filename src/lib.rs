// src/lib.rs

use axum::routing::{get, post};
use axum::Router;
use sea_orm::DatabaseConnection;
use services::{authority::AuthorityClient, token::TokenManager};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub authority: AuthorityClient,
    pub tokens: TokenManager,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        let authority = AuthorityClient::new();
        let tokens = TokenManager::new(db.clone(), authority.clone());
        Self {
            db,
            authority,
            tokens,
        }
    }
}

/// The full inbound API surface.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/sync/zones", post(handlers::sync::sync_zones))
        .route("/api/sync/divisions", post(handlers::sync::sync_divisions))
        .route("/api/sync/circles", post(handlers::sync::sync_circles))
        .route(
            "/api/sync/commission-rates",
            post(handlers::sync::sync_commission_rates),
        )
        .route(
            "/api/sync/service-types",
            post(handlers::sync::sync_service_types),
        )
        .route("/api/token/refresh", post(handlers::sync::fetch_vendor_token))
        .route(
            "/api/retailers",
            post(handlers::registration::register_retailer),
        )
        .route(
            "/api/retailers/{id}/branches",
            post(handlers::registration::register_branch),
        )
        .route(
            "/api/retailers/{id}/documents",
            post(handlers::registration::upload_document),
        )
        .route("/api/invoices", post(handlers::invoice::create_invoice))
        .route(
            "/api/invoices/sync-all",
            post(handlers::invoice::sync_all_invoices),
        )
        .route(
            "/api/invoices/{id}/sync",
            post(handlers::invoice::sync_invoice),
        )
        .route(
            "/api/invoices/{id}/return",
            post(handlers::invoice::return_invoice),
        )
        .route(
            "/api/invoices/{id}/schallan",
            get(handlers::invoice::download_schallan),
        )
        .route(
            "/api/reports/invoices",
            get(handlers::reports::invoice_report),
        )
        .route(
            "/api/reports/branch-sales",
            get(handlers::reports::branch_wise_sales),
        )
        .route(
            "/api/reports/service-type-sales",
            get(handlers::reports::service_type_wise_sales),
        )
        .with_state(state)
}

pub mod entities {
    pub mod prelude;

    pub mod circles;
    pub mod commission_rates;
    pub mod divisions;
    pub mod retailer_branches;
    pub mod retailer_registrations;
    pub mod service_types;
    pub mod sync_status;
    pub mod vat_invoices;
    pub mod vendor_configuration;
    pub mod zones;
}

pub mod services {
    pub mod authority;
    pub mod invoice;
    pub mod jurisdiction;
    pub mod master_data;
    pub mod registration;
    pub mod reporting;
    pub mod sync_status;
    pub mod token;
}

pub mod errors;
pub mod handlers;
pub mod jobs;
pub mod models;
pub mod repo;
