//! Scheduled refresh of the authority master data.
//!
//! Runs the five sync routines in dependency order (zones before
//! divisions, divisions before circles) so parent linkage can always be
//! resolved. Each routine is gated and recorded separately in
//! sync_status; one failing routine does not stop the others.

use sea_orm::DatabaseConnection;
use tokio::time::{interval, Duration};

use crate::services::authority::AuthorityClient;
use crate::services::master_data::{self, SyncOutcome};
use crate::services::sync_status::{self, intervals, jobs};
use crate::services::token::TokenManager;

const CHECK_EVERY_SECS: u64 = 3600;

pub async fn start_master_data_sync_job(
    db: DatabaseConnection,
    tokens: TokenManager,
    authority: AuthorityClient,
) {
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(CHECK_EVERY_SECS));

        loop {
            interval.tick().await;
            run_due_routines(&db, &tokens, &authority).await;
        }
    });
}

async fn run_due_routines(
    db: &DatabaseConnection,
    tokens: &TokenManager,
    authority: &AuthorityClient,
) {
    run_routine(db, jobs::ZONE_SYNC, || {
        master_data::sync_zones(db, tokens, authority, true)
    })
    .await;
    run_routine(db, jobs::COMMISSION_RATE_SYNC, || {
        master_data::sync_commission_rates(db, tokens, authority, None, true)
    })
    .await;
    run_routine(db, jobs::DIVISION_SYNC, || {
        master_data::sync_divisions(db, tokens, authority, None, true)
    })
    .await;
    run_routine(db, jobs::CIRCLE_SYNC, || {
        master_data::sync_circles(db, tokens, authority, None, true)
    })
    .await;
    run_routine(db, jobs::SERVICE_TYPE_SYNC, || {
        master_data::sync_service_types(db, tokens, authority, true)
    })
    .await;
}

async fn run_routine<F, Fut>(db: &DatabaseConnection, job_name: &str, routine: F)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = crate::errors::Result<SyncOutcome>>,
{
    match sync_status::should_sync(db, job_name, intervals::MASTER_DATA).await {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            tracing::warn!("[{}] failed to check sync status, running anyway: {}", job_name, e);
        }
    }

    match routine().await {
        Ok(outcome) => {
            tracing::info!(
                "[{}] scheduled sync done: {} new, {} updated, {} skipped",
                job_name,
                outcome.created,
                outcome.updated,
                outcome.skipped
            );
            if let Err(e) = sync_status::record_success(db, job_name, intervals::MASTER_DATA).await
            {
                tracing::warn!("[{}] failed to record sync success: {}", job_name, e);
            }
        }
        Err(e) => {
            tracing::error!("[{}] scheduled sync failed: {}", job_name, e);
            if let Err(e2) =
                sync_status::record_failure(db, job_name, &e.to_string(), intervals::MASTER_DATA)
                    .await
            {
                tracing::warn!("[{}] failed to record sync failure: {}", job_name, e2);
            }
        }
    }
}
