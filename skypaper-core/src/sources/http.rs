use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, ETAG, LAST_MODIFIED};
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Result, SkypaperError};
use crate::models::{FetchMeta, ProviderState, Signature};

use super::{filename, WallpaperProvider};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("skypaper/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Plain image URL whose changes are detected through HTTP cache validators.
///
/// Other providers embed one of these and call into it for the parts they
/// do not specialise.
pub struct HttpProvider {
    name: String,
    client: reqwest::Client,
    state: ProviderState,
}

impl HttpProvider {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            client,
            state: ProviderState::new(endpoint),
        }
    }

    pub fn state(&self) -> &ProviderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ProviderState {
        &mut self.state
    }

    /// HEAD the endpoint and compare its `Last-Modified` (or `ETag`) with the
    /// stored signature. A response without validators counts as an update.
    pub async fn check_validators(&mut self) -> Result<bool> {
        let url = self.state.endpoint().to_string();
        let req = self.client.head(&url);
        let resp = self.send(req).await?;
        debug!(url = %url, headers = ?resp.headers(), "HEAD response");

        self.state.clear_failure();
        let Some(signature) = validator(resp.headers()) else {
            debug!(url = %url, "no cache validator, treating as updated");
            return Ok(true);
        };

        let updated = self.state.observe(signature.clone());
        debug!(url = %url, signature = %signature, updated, "checked validator");
        Ok(updated)
    }

    /// GET `url` and return the body, recording the response metadata used
    /// for naming.
    pub async fn fetch(&mut self, url: &str) -> Result<bytes::Bytes> {
        let req = self.client.get(url);
        let resp = self.send(req).await?;
        debug!(url = %url, headers = ?resp.headers(), "GET response");

        let meta = FetchMeta {
            source_url: resp.url().to_string(),
            content_disposition: resp
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        };
        let bytes = match resp.bytes().await {
            Ok(b) => b,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.state.record_fetch(meta);
        Ok(bytes)
    }

    /// GET `url` and deserialize a JSON body, for sources with a manifest.
    pub async fn fetch_json<T: serde::de::DeserializeOwned>(&mut self, url: &str) -> Result<T> {
        let req = self.client.get(url);
        let resp = self.send(req).await?;
        let body = match resp.bytes().await {
            Ok(b) => b,
            Err(e) => return Err(self.fail(e.into())),
        };
        serde_json::from_slice(&body).map_err(|e| self.fail(e.into()))
    }

    pub fn default_filename(&self) -> String {
        filename::derive_filename(
            self.state.last_fetch(),
            self.state.endpoint(),
            chrono::Local::now(),
        )
    }

    /// Record `err` as the latest failure and hand it back.
    pub fn fail(&mut self, err: SkypaperError) -> SkypaperError {
        self.state.record_failure(&err);
        err
    }

    async fn send(&mut self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => return Err(self.fail(e.into())),
        };
        if resp.status() != StatusCode::OK {
            return Err(self.fail(SkypaperError::Status(resp.status().as_u16())));
        }
        Ok(resp)
    }
}

fn validator(headers: &HeaderMap) -> Option<Signature> {
    [LAST_MODIFIED, ETAG]
        .iter()
        .find_map(|name| headers.get(name).and_then(|v| v.to_str().ok()))
        .filter(|v| !v.is_empty())
        .map(Signature::new)
}

#[async_trait]
impl WallpaperProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }

    async fn check_for_update(&mut self) -> Result<bool> {
        self.check_validators().await
    }

    async fn download(&mut self) -> Result<bytes::Bytes> {
        let url = self.state.endpoint().to_string();
        self.fetch(&url).await
    }

    fn derive_filename(&self) -> String {
        self.default_filename()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn test_validator_prefers_last_modified() {
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_static("\"abc\""));
        headers.insert(
            LAST_MODIFIED,
            HeaderValue::from_static("Mon, 01 Jan 2024 00:00:00 GMT"),
        );
        assert_eq!(
            validator(&headers),
            Some(Signature::new("Mon, 01 Jan 2024 00:00:00 GMT"))
        );
    }

    #[test]
    fn test_validator_falls_back_to_etag() {
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_static("\"abc\""));
        assert_eq!(validator(&headers), Some(Signature::new("\"abc\"")));
        assert_eq!(validator(&HeaderMap::new()), None);
    }

    #[test]
    fn test_fail_records_reason() {
        let mut provider = HttpProvider::new("x", "https://example.com/a.jpg", reqwest::Client::new());
        let err = provider.fail(SkypaperError::Status(500));
        assert!(err.is_network());
        assert_eq!(
            provider.state().last_error(),
            Some(&crate::models::FailureReason::Status(500))
        );
    }
}
