//! Rendition fetcher: negotiates with the tikwm lookup API and downloads the
//! watermark-free video bytes.
//!
//! Two sequential calls: the lookup endpoint maps a canonical URL to a
//! playable media URL inside a `{ code, data: { play } }` envelope, then the
//! media URL is fetched for the bytes themselves.

use std::time::Duration;

use {
    bytes::Bytes,
    serde::Deserialize,
    tracing::{debug, warn},
};

use crate::{
    error::{DownloadError, Result},
    resolve::CanonicalUrl,
};

/// Default lookup service.
const DEFAULT_API_BASE: &str = "https://tikwm.com";

/// Timeout budget for each of the two calls.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Synthetic filename attached to every payload.
const PAYLOAD_FILENAME: &str = "tiktok_no_watermark.mp4";

// Identifying header set the upstream service requires; requests without it
// get blocked. Sent verbatim on both calls.
const HEADER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const HEADER_ACCEPT: &str = "application/json, text/plain, */*";
const HEADER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
const HEADER_ORIGIN: &str = "https://tikwm.com";
const HEADER_REFERER: &str = "https://tikwm.com/";

/// Lookup envelope (subset of fields we care about).
#[derive(Debug, Deserialize)]
struct LookupResponse {
    /// 0 on success; anything else, including absence, is an upstream
    /// rejection.
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    data: Option<LookupData>,
}

#[derive(Debug, Deserialize)]
struct LookupData {
    /// Playable watermark-free media URL.
    #[serde(default)]
    play: Option<String>,
}

/// Raw video bytes plus the synthetic filename, handed to the front end for
/// immediate re-transmission. Never persisted.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub bytes: Bytes,
    pub filename: String,
}

/// Client for the two-call lookup protocol.
pub struct RenditionFetcher {
    client: reqwest::Client,
    api_base: String,
}

impl RenditionFetcher {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.into(),
        }
    }

    /// Point the fetcher at a different lookup service (tests use a local
    /// mock server).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Fetch the watermark-free rendition for `url`.
    ///
    /// Classification: a non-200 status or a non-success envelope on either
    /// call is [`DownloadError::Api`]; transport failures and malformed
    /// bodies are [`DownloadError::General`].
    pub async fn fetch(&self, url: &CanonicalUrl) -> Result<MediaPayload> {
        let play_url = self.lookup(url).await?;
        self.download(&play_url).await
    }

    /// First call: ask the lookup endpoint for the playable media URL.
    async fn lookup(&self, url: &CanonicalUrl) -> Result<String> {
        let endpoint = format!("{}/api/", self.api_base);
        let response = self
            .with_headers(self.client.get(&endpoint))
            .query(&[("url", url.as_str()), ("hd", "1")])
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| DownloadError::general("lookup request", e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(%status, url = %url, "lookup API returned non-200");
            return Err(DownloadError::api(format!("lookup status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::general("read lookup response", e))?;
        let envelope: LookupResponse = serde_json::from_str(&body)
            .map_err(|e| DownloadError::general("parse lookup response", e))?;

        if envelope.code != Some(0) {
            warn!(code = ?envelope.code, url = %url, "lookup API rejected link");
            return Err(DownloadError::api(match envelope.code {
                Some(code) => format!("lookup code {code}"),
                None => "lookup response has no code".into(),
            }));
        }

        envelope
            .data
            .and_then(|d| d.play)
            .ok_or_else(|| DownloadError::api("lookup response has no play URL"))
    }

    /// Second call: download the media bytes themselves.
    async fn download(&self, play_url: &str) -> Result<MediaPayload> {
        let response = self
            .with_headers(self.client.get(play_url))
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| DownloadError::general("media request", e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(%status, play_url, "media endpoint returned non-200");
            return Err(DownloadError::api(format!("media status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::general("read media body", e))?;
        debug!(bytes = bytes.len(), "rendition downloaded");

        Ok(MediaPayload {
            bytes,
            filename: PAYLOAD_FILENAME.into(),
        })
    }

    fn with_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("User-Agent", HEADER_USER_AGENT)
            .header("Accept", HEADER_ACCEPT)
            .header("Accept-Language", HEADER_ACCEPT_LANGUAGE)
            .header("Origin", HEADER_ORIGIN)
            .header("Referer", HEADER_REFERER)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, mockito::Matcher};

    fn fetcher(server: &mockito::Server) -> RenditionFetcher {
        RenditionFetcher::new(reqwest::Client::new()).with_api_base(server.url())
    }

    fn canonical() -> CanonicalUrl {
        CanonicalUrl::new("https://www.tiktok.com/@user/video/1234567890")
    }

    #[tokio::test]
    async fn round_trips_media_bytes() {
        let mut server = mockito::Server::new_async().await;
        let play = format!("{}/media/video.mp4", server.url());
        let lookup = server
            .mock("GET", "/api/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("url".into(), canonical().as_str().into()),
                Matcher::UrlEncoded("hd".into(), "1".into()),
            ]))
            .match_header("origin", "https://tikwm.com")
            .match_header("referer", "https://tikwm.com/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"code":0,"data":{{"play":"{play}"}}}}"#))
            .create_async()
            .await;
        let media = server
            .mock("GET", "/media/video.mp4")
            .with_status(200)
            .with_body(b"\x00\x01video-bytes\x02")
            .create_async()
            .await;

        let payload = fetcher(&server).fetch(&canonical()).await.unwrap();
        assert_eq!(payload.bytes.as_ref(), b"\x00\x01video-bytes\x02");
        assert!(payload.filename.ends_with(".mp4"));
        lookup.assert_async().await;
        media.assert_async().await;
    }

    #[tokio::test]
    async fn non_zero_envelope_code_is_api_failure() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":1}"#)
            .create_async()
            .await;

        let err = fetcher(&server).fetch(&canonical()).await.unwrap_err();
        assert!(matches!(err, DownloadError::Api { .. }));
    }

    #[tokio::test]
    async fn http_500_is_api_failure() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let err = fetcher(&server).fetch(&canonical()).await.unwrap_err();
        assert!(matches!(err, DownloadError::Api { .. }));
    }

    #[tokio::test]
    async fn missing_play_url_is_api_failure() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":0,"data":{}}"#)
            .create_async()
            .await;

        let err = fetcher(&server).fetch(&canonical()).await.unwrap_err();
        assert!(matches!(err, DownloadError::Api { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_general_failure() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = fetcher(&server).fetch(&canonical()).await.unwrap_err();
        assert!(matches!(err, DownloadError::General { .. }));
    }

    #[tokio::test]
    async fn media_connection_failure_is_general_failure() {
        let mut server = mockito::Server::new_async().await;
        // Nothing listens on port 1, so the media request is refused.
        let _lookup = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":0,"data":{"play":"http://127.0.0.1:1/video.mp4"}}"#)
            .create_async()
            .await;

        let err = fetcher(&server).fetch(&canonical()).await.unwrap_err();
        assert!(matches!(err, DownloadError::General { .. }));
    }

    #[tokio::test]
    async fn media_404_is_api_failure() {
        let mut server = mockito::Server::new_async().await;
        let play = format!("{}/media/gone.mp4", server.url());
        let _lookup = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(format!(r#"{{"code":0,"data":{{"play":"{play}"}}}}"#))
            .create_async()
            .await;
        let _media = server
            .mock("GET", "/media/gone.mp4")
            .with_status(404)
            .create_async()
            .await;

        let err = fetcher(&server).fetch(&canonical()).await.unwrap_err();
        assert!(matches!(err, DownloadError::Api { .. }));
    }
}
