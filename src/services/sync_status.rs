//! Sync bookkeeping for scheduled jobs.
//!
//! Tracks when each job last ran successfully so restarts and overlapping
//! triggers do not hammer the authority with redundant fetches.

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::sync_status::{self, Entity as SyncStatus};
use crate::errors::Result;

/// Job names for tracking sync status
pub mod jobs {
    pub const ZONE_SYNC: &str = "zone_sync";
    pub const DIVISION_SYNC: &str = "division_sync";
    pub const CIRCLE_SYNC: &str = "circle_sync";
    pub const COMMISSION_RATE_SYNC: &str = "commission_rate_sync";
    pub const SERVICE_TYPE_SYNC: &str = "service_type_sync";
    pub const INVOICE_AUTO_SYNC: &str = "invoice_auto_sync";
}

/// Default minimum intervals between syncs (in seconds)
pub mod intervals {
    pub const MASTER_DATA: i32 = 21600; // 6 hours, reference data moves slowly
    pub const INVOICE_AUTO_SYNC: i32 = 900; // 15 minutes
}

/// Check whether a job should run: true on first run or once the minimum
/// interval since the last success has elapsed.
pub async fn should_sync(
    db: &DatabaseConnection,
    job_name: &str,
    _default_interval_secs: i32,
) -> Result<bool> {
    let status = SyncStatus::find()
        .filter(sync_status::Column::JobName.eq(job_name))
        .one(db)
        .await?;

    match status {
        None => {
            tracing::info!("[{}] first run detected, will sync", job_name);
            Ok(true)
        }
        Some(record) => match record.last_success_at {
            None => {
                tracing::info!("[{}] no previous successful sync, will sync", job_name);
                Ok(true)
            }
            Some(last_success) => {
                let now = Utc::now().naive_utc();
                let elapsed = now.signed_duration_since(last_success);
                let interval = Duration::seconds(record.min_interval_secs as i64);

                if elapsed >= interval {
                    tracing::info!(
                        "[{}] last sync was {}s ago (min: {}s), will sync",
                        job_name,
                        elapsed.num_seconds(),
                        record.min_interval_secs
                    );
                    Ok(true)
                } else {
                    tracing::debug!(
                        "[{}] skipping sync, next run in {}s",
                        job_name,
                        (interval - elapsed).num_seconds()
                    );
                    Ok(false)
                }
            }
        },
    }
}

/// Record a successful sync
pub async fn record_success(
    db: &DatabaseConnection,
    job_name: &str,
    default_interval_secs: i32,
) -> Result<()> {
    let now = Utc::now().naive_utc();

    let existing = SyncStatus::find()
        .filter(sync_status::Column::JobName.eq(job_name))
        .one(db)
        .await?;

    match existing {
        Some(record) => {
            let success_count = record.success_count;
            let mut active: sync_status::ActiveModel = record.into();
            active.last_success_at = Set(Some(now));
            active.last_attempt_at = Set(Some(now));
            active.last_error = Set(None);
            active.success_count = Set(success_count + 1);
            active.update(db).await?;
        }
        None => {
            sync_status::ActiveModel {
                job_name: Set(job_name.to_string()),
                last_success_at: Set(Some(now)),
                last_attempt_at: Set(Some(now)),
                last_error: Set(None),
                success_count: Set(1),
                error_count: Set(0),
                min_interval_secs: Set(default_interval_secs),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    tracing::debug!("[{}] recorded successful sync", job_name);
    Ok(())
}

/// Record a failed sync attempt
pub async fn record_failure(
    db: &DatabaseConnection,
    job_name: &str,
    error: &str,
    default_interval_secs: i32,
) -> Result<()> {
    let now = Utc::now().naive_utc();

    let existing = SyncStatus::find()
        .filter(sync_status::Column::JobName.eq(job_name))
        .one(db)
        .await?;

    match existing {
        Some(record) => {
            let error_count = record.error_count;
            let mut active: sync_status::ActiveModel = record.into();
            active.last_attempt_at = Set(Some(now));
            active.last_error = Set(Some(error.to_string()));
            active.error_count = Set(error_count + 1);
            active.update(db).await?;
        }
        None => {
            sync_status::ActiveModel {
                job_name: Set(job_name.to_string()),
                last_success_at: Set(None),
                last_attempt_at: Set(Some(now)),
                last_error: Set(Some(error.to_string())),
                success_count: Set(0),
                error_count: Set(1),
                min_interval_secs: Set(default_interval_secs),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    tracing::debug!("[{}] recorded failed sync: {}", job_name, error);
    Ok(())
}
