//! Access-token management for the authority API.
//!
//! The vendor configuration row is the single source of truth: the token
//! manager re-reads it per operation (so operator edits take effect
//! without a restart) and writes refreshed tokens back onto it.
//! Concurrent refreshes are tolerated; the last write wins and every
//! caller still ends up holding a currently valid token.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

use crate::entities::{prelude::*, vendor_configuration};
use crate::errors::{IntegrationError, Result};
use crate::services::authority::AuthorityClient;

/// Expiry timestamps as the authority formats them
const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A usable authenticated session against the authority API.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub base_url: String,
    pub access_token: String,
    pub company_id: Option<String>,
}

#[derive(Clone)]
pub struct TokenManager {
    db: DatabaseConnection,
    authority: AuthorityClient,
}

impl TokenManager {
    pub fn new(db: DatabaseConnection, authority: AuthorityClient) -> Self {
        Self { db, authority }
    }

    /// Load and validate the vendor configuration row.
    ///
    /// Fails with a `Config` error naming the problem: no row, disabled,
    /// or a missing credential field.
    pub async fn load_config(&self) -> Result<vendor_configuration::Model> {
        let config = VendorConfiguration::find()
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                IntegrationError::Config("no POS vendor configuration found".to_string())
            })?;

        if config.disabled {
            return Err(IntegrationError::Config(
                "POS vendor configuration is disabled".to_string(),
            ));
        }
        if config.base_url.trim().is_empty() {
            return Err(IntegrationError::Config(
                "vendor configuration is missing base_url".to_string(),
            ));
        }
        if config.client_id.trim().is_empty() {
            return Err(IntegrationError::Config(
                "vendor configuration is missing client_id".to_string(),
            ));
        }
        if config.client_secret.trim().is_empty() {
            return Err(IntegrationError::Config(
                "vendor configuration is missing client_secret".to_string(),
            ));
        }

        Ok(config)
    }

    /// Return a valid session, refreshing the stored token when it is
    /// absent, expired, or `force_refresh` is set.
    pub async fn get_valid_token(&self, force_refresh: bool) -> Result<AuthSession> {
        let config = self.load_config().await?;

        if !force_refresh {
            if let Some(token) = stored_token(&config, Utc::now().naive_utc()) {
                return Ok(AuthSession {
                    base_url: config.base_url.clone(),
                    access_token: token,
                    company_id: config.company_id.clone(),
                });
            }
        }

        tracing::info!("requesting new access token from authority");
        let reply = self
            .authority
            .authenticate(&config.base_url, &config.client_id, &config.client_secret)
            .await?;

        let expiry = reply
            .expiry_time
            .as_deref()
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, EXPIRY_FORMAT).ok());
        if expiry.is_none() {
            tracing::warn!(
                "token response carried no parseable expiry_time; next call will refresh"
            );
        }

        let base_url = config.base_url.clone();
        let access_token = reply.access_token.clone();
        // Keep the previously assigned company id when the reply omits it
        let company_id = reply.company_id.clone().or_else(|| config.company_id.clone());

        let mut active = config.into_active_model();
        active.access_token = Set(Some(reply.access_token));
        active.token_expiry = Set(expiry);
        if reply.company_id.is_some() {
            active.company_id = Set(reply.company_id);
        }
        active.updated_at = Set(Some(Utc::now().naive_utc()));
        active.update(&self.db).await?;

        Ok(AuthSession {
            base_url,
            access_token,
            company_id,
        })
    }

    /// Run an authenticated operation, forcing exactly one token refresh
    /// and retry if the authority answers 401. A second 401 surfaces as
    /// `Unauthorized`.
    pub async fn with_auth_retry<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn(AuthSession) -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let session = self.get_valid_token(false).await?;
        match op(session).await {
            Err(IntegrationError::Unauthorized(msg)) => {
                tracing::warn!("authority returned 401, refreshing token once: {}", msg);
                let session = self.get_valid_token(true).await?;
                op(session).await
            }
            other => other,
        }
    }
}

/// The stored token, if it is present and not yet expired at `now`.
/// A missing or unparseable expiry counts as expired.
fn stored_token(config: &vendor_configuration::Model, now: NaiveDateTime) -> Option<String> {
    let token = config.access_token.as_ref()?;
    if token.is_empty() {
        return None;
    }
    let expiry = config.token_expiry?;
    if expiry > now {
        Some(token.clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::vendor_configuration::SyncSchedule;
    use chrono::Duration;

    fn config_with(
        token: Option<&str>,
        expiry: Option<NaiveDateTime>,
    ) -> vendor_configuration::Model {
        vendor_configuration::Model {
            id: 1,
            base_url: "https://vat.example.gov".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            access_token: token.map(|t| t.to_string()),
            token_expiry: expiry,
            company_id: Some("C-1".to_string()),
            disabled: false,
            sync_schedule: SyncSchedule::Scheduled,
            updated_at: None,
        }
    }

    #[test]
    fn valid_future_expiry_reuses_stored_token() {
        let now = Utc::now().naive_utc();
        let config = config_with(Some("tok"), Some(now + Duration::hours(1)));
        assert_eq!(stored_token(&config, now).as_deref(), Some("tok"));
    }

    #[test]
    fn past_expiry_forces_refresh() {
        let now = Utc::now().naive_utc();
        let config = config_with(Some("tok"), Some(now - Duration::seconds(1)));
        assert_eq!(stored_token(&config, now), None);
    }

    #[test]
    fn missing_expiry_forces_refresh() {
        let now = Utc::now().naive_utc();
        let config = config_with(Some("tok"), None);
        assert_eq!(stored_token(&config, now), None);
    }

    #[test]
    fn missing_token_forces_refresh() {
        let now = Utc::now().naive_utc();
        let config = config_with(None, Some(now + Duration::hours(1)));
        assert_eq!(stored_token(&config, now), None);
    }

    #[test]
    fn expiry_format_matches_authority() {
        let parsed = NaiveDateTime::parse_from_str("2026-08-06 12:30:00", EXPIRY_FORMAT);
        assert!(parsed.is_ok());
    }
}
