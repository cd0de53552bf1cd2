//! Background batch sync of Pending and Failed VAT invoices.

use sea_orm::DatabaseConnection;
use tokio::time::{interval, Duration};

use crate::services::authority::AuthorityClient;
use crate::services::invoice;
use crate::services::sync_status::{self, intervals, jobs};
use crate::services::token::TokenManager;

const CHECK_EVERY_SECS: u64 = 300;

pub async fn start_invoice_auto_sync_job(
    db: DatabaseConnection,
    tokens: TokenManager,
    authority: AuthorityClient,
) {
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(CHECK_EVERY_SECS));

        loop {
            interval.tick().await;

            match sync_status::should_sync(&db, jobs::INVOICE_AUTO_SYNC, intervals::INVOICE_AUTO_SYNC)
                .await
            {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!("failed to check invoice sync status, running anyway: {}", e);
                }
            }

            match invoice::auto_sync_vat_invoices(&db, &tokens, &authority).await {
                Ok(outcome) if outcome.failed == 0 => {
                    if let Err(e) = sync_status::record_success(
                        &db,
                        jobs::INVOICE_AUTO_SYNC,
                        intervals::INVOICE_AUTO_SYNC,
                    )
                    .await
                    {
                        tracing::warn!("failed to record invoice sync success: {}", e);
                    }
                }
                Ok(outcome) => {
                    // Partial success still advances the schedule; the
                    // failed invoices stay queued for the next round.
                    tracing::warn!(
                        "invoice batch finished with {} failures of {}",
                        outcome.failed,
                        outcome.total
                    );
                    if let Err(e) = sync_status::record_success(
                        &db,
                        jobs::INVOICE_AUTO_SYNC,
                        intervals::INVOICE_AUTO_SYNC,
                    )
                    .await
                    {
                        tracing::warn!("failed to record invoice sync success: {}", e);
                    }
                }
                Err(e) => {
                    tracing::error!("invoice batch sync failed: {}", e);
                    if let Err(e2) = sync_status::record_failure(
                        &db,
                        jobs::INVOICE_AUTO_SYNC,
                        &e.to_string(),
                        intervals::INVOICE_AUTO_SYNC,
                    )
                    .await
                    {
                        tracing::warn!("failed to record invoice sync failure: {}", e2);
                    }
                }
            }
        }
    });
}
