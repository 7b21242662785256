//! Redirect resolver: turns opaque short links into canonical video URLs.

use std::time::Duration;

use tracing::debug;

use crate::{
    error::{DownloadError, Result},
    scan::{Link, SHORT_LINK_HOSTS},
};

/// Timeout budget for the redirect-following request.
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully resolved, redirect-free video URL.
///
/// Canonical URLs carry a `/video/<digits>` segment; one that doesn't fails
/// the pipeline at identifier extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves links to their canonical landing URLs.
///
/// Links on a short-link host get a HEAD request with redirects followed and
/// no body transferred; the final URL after redirects is taken. Links already
/// in canonical form pass through unchanged without touching the network, so
/// resolving a canonical URL is a no-op.
pub struct Resolver {
    client: reqwest::Client,
    short_hosts: Vec<String>,
}

impl Resolver {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            short_hosts: SHORT_LINK_HOSTS.iter().map(|h| (*h).to_owned()).collect(),
        }
    }

    /// Override which hosts count as short links (tests point this at a
    /// local mock server).
    #[must_use]
    pub fn with_short_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.short_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    fn is_short_form(&self, link: &Link) -> bool {
        link.host()
            .is_some_and(|host| self.short_hosts.iter().any(|h| *h == host))
    }

    pub async fn resolve(&self, link: &Link) -> Result<CanonicalUrl> {
        if !self.is_short_form(link) {
            return Ok(CanonicalUrl::new(link.as_str()));
        }
        self.follow_redirects(link.as_str()).await
    }

    async fn follow_redirects(&self, url: &str) -> Result<CanonicalUrl> {
        let response = self
            .client
            .head(url)
            .timeout(RESOLVE_TIMEOUT)
            .send()
            .await
            .map_err(|source| DownloadError::Resolution { source })?;
        let resolved = response.url().to_string();
        debug!(short = url, resolved, "short link resolved");
        Ok(CanonicalUrl::new(resolved))
    }
}
