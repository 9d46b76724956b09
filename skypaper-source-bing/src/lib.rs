use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use skypaper_core::error::{Result, SkypaperError};
use skypaper_core::models::{ProviderState, Signature};
use skypaper_core::sources::filename::sanitize;
use skypaper_core::sources::{HttpProvider, ProviderRegistry, WallpaperProvider};

pub const NAME: &str = "bing";
const SITE: &str = "https://cn.bing.com";
const ARCHIVE_PATH: &str = "HPImageArchive.aspx?format=js&idx=0&n=1";

pub fn register(registry: &mut ProviderRegistry) {
    registry.register(NAME, "Bing picture of the day", |client| {
        Box::new(BingProvider::new(client))
    });
}

/// Bing's daily image. The archive endpoint returns a JSON manifest whose
/// `fullstartdate` changes once per new picture; cache headers on it are not
/// reliable, so the manifest itself is fetched on every check.
pub struct BingProvider {
    base: HttpProvider,
    site: String,
    current: Option<Captured>,
}

/// Naming details of the image most recently downloaded.
#[derive(Debug, Clone)]
struct Captured {
    fullstartdate: String,
    display_name: String,
}

impl BingProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_site(SITE, client)
    }

    /// Point at another host serving the same API (mirrors, tests).
    pub fn with_site(site: impl Into<String>, client: reqwest::Client) -> Self {
        let site = site.into().trim_end_matches('/').to_string();
        let manifest = format!("{site}/{ARCHIVE_PATH}");
        Self {
            base: HttpProvider::new(NAME, manifest, client),
            site,
            current: None,
        }
    }

    async fn latest_image(&mut self) -> Result<BingImage> {
        let manifest_url = self.base.state().endpoint().to_string();
        let manifest: BingManifest = self.base.fetch_json(&manifest_url).await?;
        match manifest.images.into_iter().next() {
            Some(image) => Ok(image),
            None => Err(self
                .base
                .fail(SkypaperError::Decode("manifest has no images".into()))),
        }
    }
}

#[async_trait]
impl WallpaperProvider for BingProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn state(&self) -> &ProviderState {
        self.base.state()
    }

    async fn check_for_update(&mut self) -> Result<bool> {
        let image = self.latest_image().await?;
        let state = self.base.state_mut();
        state.clear_failure();
        let updated = state.observe(Signature::new(&image.fullstartdate));
        debug!(fullstartdate = %image.fullstartdate, updated, "checked bing manifest");
        Ok(updated)
    }

    async fn download(&mut self) -> Result<bytes::Bytes> {
        let image = self.latest_image().await?;
        let image_url = match Url::parse(&self.site).and_then(|site| site.join(&image.url)) {
            Ok(url) => url,
            Err(e) => {
                return Err(self
                    .base
                    .fail(SkypaperError::Decode(format!("bad image url {}: {e}", image.url))))
            }
        };

        let bytes = self.base.fetch(image_url.as_str()).await?;
        self.current = Some(Captured {
            display_name: image.display_name(),
            fullstartdate: image.fullstartdate,
        });
        Ok(bytes)
    }

    fn derive_filename(&self) -> String {
        match &self.current {
            Some(c) if !c.fullstartdate.is_empty() => {
                format!("{}{}", c.fullstartdate, c.display_name)
            }
            _ => self.base.default_filename(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BingManifest {
    #[serde(default)]
    images: Vec<BingImage>,
}

#[derive(Debug, Clone, Deserialize)]
struct BingImage {
    fullstartdate: String,
    url: String,
    #[serde(default)]
    copyright: String,
    #[serde(default)]
    title: String,
}

impl BingImage {
    /// First word of the copyright line (the subject, before the credit),
    /// else the title.
    fn display_name(&self) -> String {
        let subject = self
            .copyright
            .split_whitespace()
            .next()
            .and_then(sanitize)
            .or_else(|| sanitize(self.title.trim()))
            .unwrap_or_else(|| NAME.to_string());
        format!("{subject}.jpg")
    }
}
