//! Per-link download sequencing: resolve, then extract, then fetch.

use {async_trait::async_trait, tracing::info};

use crate::{
    error::{DownloadError, Result},
    extract::extract,
    fetch::{MediaPayload, RenditionFetcher},
    resolve::Resolver,
    scan::Link,
};

/// Seam between orchestration and the network stages, so the orchestrator is
/// testable with stub downloads.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Run the full resolve → extract → fetch sequence for one link.
    async fn download(&self, link: &Link) -> Result<MediaPayload>;
}

/// Production downloader driving the real HTTP stages.
pub struct HttpDownloader {
    resolver: Resolver,
    fetcher: RenditionFetcher,
}

impl HttpDownloader {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            resolver: Resolver::new(client.clone()),
            fetcher: RenditionFetcher::new(client),
        }
    }

    /// Point the lookup calls at a different service (tests, self-hosted
    /// tikwm mirrors).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.fetcher = self.fetcher.with_api_base(api_base);
        self
    }

    /// Override which hosts count as short links (tests point this at a
    /// local mock server).
    #[must_use]
    pub fn with_short_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolver = self.resolver.with_short_hosts(hosts);
        self
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, link: &Link) -> Result<MediaPayload> {
        let canonical = self.resolver.resolve(link).await?;
        let video_id = extract(&canonical).ok_or_else(|| {
            DownloadError::IdentifierNotFound {
                url: canonical.as_str().to_owned(),
            }
        })?;
        // The id is diagnostics only; the lookup API takes the canonical URL.
        info!(%video_id, canonical = %canonical, "downloading rendition");
        self.fetcher.fetch(&canonical).await
    }
}
