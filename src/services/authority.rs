//! HTTP client for the tax authority's integration API.
//!
//! Every request shape here mirrors the authority contract: field names
//! in request payloads are authority-defined and preserved byte-for-byte.
//! Master-data list responses are cached (moka) so repeated form lookups
//! do not hammer the authority; callers bypass the cache with
//! `force_refresh`.

use moka::future::Cache;
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::errors::{IntegrationError, Result};
use crate::services::token::AuthSession;

/// TTL for cached master-data lists
const LIST_CACHE_TTL_SECS: u64 = 900;

#[derive(Clone)]
pub struct AuthorityClient {
    client: Client,
    list_cache: Cache<String, Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct AuthenticateResponse {
    pub access_token: String,
    pub expiry_time: Option<String>,
    pub company_id: Option<String>,
}

/// Reply to retailer and branch registration submissions.
///
/// An "already exists" reply carries the existing identifier in
/// `retailer_number`; it is treated as success by the callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationReply {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub retailer_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReply {
    pub status: String,
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallanReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub challan_id: Option<String>,
}

impl AuthorityClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client"),
            list_cache: Cache::builder()
                .max_capacity(32)
                .time_to_live(Duration::from_secs(LIST_CACHE_TTL_SECS))
                .build(),
        }
    }

    /// Credential-grant request against the authority token endpoint.
    /// Uses HTTP basic auth; no bearer token yet.
    pub async fn authenticate(
        &self,
        base_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AuthenticateResponse> {
        let url = format!("{}/integration/vendor_authenticate", base_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .basic_auth(client_id, Some(client_secret))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(IntegrationError::Unauthorized(body));
        }
        if !status.is_success() {
            return Err(IntegrationError::RemoteValidation(format!(
                "authentication failed ({}): {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            IntegrationError::Parse(format!("token response: {} (body: {})", e, body))
        })
    }

    /// Fetch one of the master-data list endpoints, going through the
    /// cache unless `force_refresh`. Rows come back untyped so a single
    /// malformed row cannot poison the batch; sync routines decode and
    /// skip per row.
    async fn fetch_list(
        &self,
        session: &AuthSession,
        path: &str,
        query: &[(&str, &str)],
        force_refresh: bool,
    ) -> Result<Vec<Value>> {
        let cache_key = if query.is_empty() {
            path.to_string()
        } else {
            let params: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!("{}?{}", path, params.join("&"))
        };

        if !force_refresh {
            if let Some(cached) = self.list_cache.get(&cache_key).await {
                tracing::debug!("cache hit for {}", cache_key);
                return Ok(cached);
            }
        }

        let url = format!("{}{}", session.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&session.access_token)
            .query(query)
            .send()
            .await?;

        let rows: Vec<Value> = Self::decode_json(response).await?;
        self.list_cache.insert(cache_key, rows.clone()).await;
        Ok(rows)
    }

    pub async fn fetch_zone_list(
        &self,
        session: &AuthSession,
        force_refresh: bool,
    ) -> Result<Vec<Value>> {
        self.fetch_list(session, "/integration/zone_list", &[], force_refresh)
            .await
    }

    pub async fn fetch_commission_rate_list(
        &self,
        session: &AuthSession,
        zone_id: Option<&str>,
        force_refresh: bool,
    ) -> Result<Vec<Value>> {
        let mut query = Vec::new();
        if let Some(zone_id) = zone_id {
            query.push(("zone_id", zone_id));
        }
        self.fetch_list(
            session,
            "/integration/vat_commission_rate_list",
            &query,
            force_refresh,
        )
        .await
    }

    pub async fn fetch_division_list(
        &self,
        session: &AuthSession,
        vat_commissionrate_id: Option<&str>,
        force_refresh: bool,
    ) -> Result<Vec<Value>> {
        let mut query = Vec::new();
        if let Some(rate_id) = vat_commissionrate_id {
            query.push(("vat_commissionrate_id", rate_id));
        }
        self.fetch_list(session, "/integration/division_list", &query, force_refresh)
            .await
    }

    pub async fn fetch_circle_list(
        &self,
        session: &AuthSession,
        division_id: Option<&str>,
        force_refresh: bool,
    ) -> Result<Vec<Value>> {
        let mut query = Vec::new();
        if let Some(division_id) = division_id {
            query.push(("division_id", division_id));
        }
        self.fetch_list(session, "/integration/circle_list", &query, force_refresh)
            .await
    }

    pub async fn fetch_service_type_list(
        &self,
        session: &AuthSession,
        force_refresh: bool,
    ) -> Result<Vec<Value>> {
        self.fetch_list(session, "/integration/service_type_list", &[], force_refresh)
            .await
    }

    pub async fn register_retailer(
        &self,
        session: &AuthSession,
        payload: &Value,
    ) -> Result<RegistrationReply> {
        self.post_json(session, "/integration/retailer_registration", payload)
            .await
    }

    pub async fn register_branch(
        &self,
        session: &AuthSession,
        payload: &Value,
    ) -> Result<RegistrationReply> {
        self.post_json(session, "/integration/retailer_branch_registration", payload)
            .await
    }

    /// Multipart document upload against the retailer document endpoint.
    pub async fn upload_document(
        &self,
        session: &AuthSession,
        retailer_number: &str,
        document_kind: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReply> {
        let url = format!("{}/integration/retailer_document_upload", session.base_url);

        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .text("retailer_number", retailer_number.to_string())
            .text("document_type", document_kind.to_string())
            .part("file", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&session.access_token)
            .multipart(form)
            .send()
            .await?;

        Self::decode_json(response).await
    }

    pub async fn submit_challan(
        &self,
        session: &AuthSession,
        payload: &Value,
    ) -> Result<ChallanReply> {
        self.post_json(session, "/integration/challan_submission", payload)
            .await
    }

    pub async fn return_challan(
        &self,
        session: &AuthSession,
        payload: &Value,
    ) -> Result<ChallanReply> {
        self.post_json(session, "/integration/challan_return", payload)
            .await
    }

    /// Fetch the rendered schallan document for a submitted challan.
    /// Returns the raw bytes; the caller decides where they live.
    pub async fn download_schallan(
        &self,
        session: &AuthSession,
        challan_id: &str,
    ) -> Result<Vec<u8>> {
        let url = format!(
            "{}/integration/schallan_download/{}",
            session.base_url, challan_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Unauthorized(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::RemoteValidation(format!(
                "schallan download failed ({}): {}",
                status, body
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        session: &AuthSession,
        path: &str,
        payload: &Value,
    ) -> Result<T> {
        let url = format!("{}{}", session.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&session.access_token)
            .json(payload)
            .send()
            .await?;

        Self::decode_json(response).await
    }

    async fn decode_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(IntegrationError::Unauthorized(body));
        }
        if !status.is_success() {
            return Err(IntegrationError::RemoteValidation(format!(
                "authority error ({}): {}",
                status, body
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| IntegrationError::Parse(format!("{} (body: {})", e, body)))
    }
}

impl Default for AuthorityClient {
    fn default() -> Self {
        Self::new()
    }
}
