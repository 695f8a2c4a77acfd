//! HTTP implementation of the platform addon API
//!
//! One synchronous remote call per operation; no retry, backoff or caching
//! at this layer. Timeouts are whatever the underlying HTTP client defaults
//! to. Non-2xx responses are decoded into the platform's `{id, message}`
//! error body and surfaced unmodified.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::types::{
    Addon, AddonAttachment, ApiErrorBody, CreateAddonRequest, UpdateAddonRequest,
};
use crate::api::AddonApi;
use crate::config::ProviderConfig;
use crate::error::{Error, Result};

/// Media type the platform expects on every request
const ACCEPT_HEADER: &str = "application/vnd.heroku+json; version=3";

// =============================================================================
// Platform Client
// =============================================================================

/// Typed REST client for the platform addon API
pub struct PlatformClient {
    http: Client,
    base_url: Url,
}

impl PlatformClient {
    /// Build a client from validated provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| Error::Configuration("api_key contains invalid header bytes".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder().default_headers(headers).build()?;
        let base_url: Url = config
            .base_url
            .parse()
            .map_err(|e| Error::Configuration(format!("invalid base_url: {}", e)))?;

        Ok(Self { http, base_url })
    }

    /// Join percent-encoded path segments onto the base URL
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.as_str().trim_end_matches('/').to_string();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

async fn decode<T: DeserializeOwned>(resp: Response, kind: &str, name: &str) -> Result<T> {
    check_status(&resp, kind, name)?;
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }
    Ok(resp.json().await?)
}

async fn expect_success(resp: Response, kind: &str, name: &str) -> Result<()> {
    check_status(&resp, kind, name)?;
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }
    Ok(())
}

fn check_status(resp: &Response, kind: &str, name: &str) -> Result<()> {
    if resp.status() == StatusCode::NOT_FOUND {
        return Err(Error::not_found(kind, name));
    }
    Ok(())
}

async fn api_error(resp: Response) -> Error {
    let status = resp.status().as_u16();
    let body: ApiErrorBody = resp.json().await.unwrap_or_default();
    Error::Api {
        status,
        code: body.id,
        message: body.message,
    }
}

// =============================================================================
// AddonApi Implementation
// =============================================================================

#[async_trait]
impl AddonApi for PlatformClient {
    async fn create_addon(&self, app: &str, req: CreateAddonRequest) -> Result<Addon> {
        debug!(app, plan = %req.plan, "POST addon");
        let resp = self
            .http
            .post(self.endpoint(&["apps", app, "addons"]))
            .json(&req)
            .send()
            .await?;
        decode(resp, "App", app).await
    }

    async fn addon_info(&self, app: &str, id_or_name: &str) -> Result<Addon> {
        debug!(app, addon = id_or_name, "GET addon");
        let resp = self
            .http
            .get(self.endpoint(&["apps", app, "addons", id_or_name]))
            .send()
            .await?;
        decode(resp, "Addon", id_or_name).await
    }

    async fn addon_info_by_name(&self, name: &str) -> Result<Addon> {
        debug!(addon = name, "GET addon (account-wide)");
        let resp = self.http.get(self.endpoint(&["addons", name])).send().await?;
        decode(resp, "Addon", name).await
    }

    async fn update_addon(&self, app: &str, id: &str, req: UpdateAddonRequest) -> Result<Addon> {
        debug!(app, addon = id, "PATCH addon");
        let resp = self
            .http
            .patch(self.endpoint(&["apps", app, "addons", id]))
            .json(&req)
            .send()
            .await?;
        decode(resp, "Addon", id).await
    }

    async fn delete_addon(&self, app: &str, id: &str) -> Result<()> {
        debug!(app, addon = id, "DELETE addon");
        let resp = self
            .http
            .delete(self.endpoint(&["apps", app, "addons", id]))
            .send()
            .await?;
        expect_success(resp, "Addon", id).await
    }

    async fn list_attachments(&self, addon_id: &str) -> Result<Vec<AddonAttachment>> {
        debug!(addon = addon_id, "GET addon attachments");
        let resp = self
            .http
            .get(self.endpoint(&["addons", addon_id, "addon-attachments"]))
            .send()
            .await?;
        decode(resp, "Addon", addon_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> PlatformClient {
        let config = ProviderConfig::new("test-key").with_base_url(base);
        PlatformClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("https://api.example.com");
        assert_eq!(
            client.endpoint(&["apps", "tftest-abc123", "addons"]),
            "https://api.example.com/apps/tftest-abc123/addons"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = client("https://api.example.com/");
        assert_eq!(
            client.endpoint(&["addons", "deployhooks-infinite-2387"]),
            "https://api.example.com/addons/deployhooks-infinite-2387"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("https://api.example.com");
        assert_eq!(
            client.endpoint(&["apps", "name with/slash"]),
            "https://api.example.com/apps/name%20with%2Fslash"
        );
    }

    #[test]
    fn test_rejects_invalid_api_key_bytes() {
        let config = ProviderConfig::new("bad\nkey");
        assert!(PlatformClient::new(&config).is_err());
    }
}
