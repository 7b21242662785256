//! Identifier extractor: pulls the numeric video id out of a canonical URL.

use {once_cell::sync::Lazy, regex::Regex};

use crate::resolve::CanonicalUrl;

#[allow(clippy::expect_used)] // literal pattern, compiles
static VIDEO_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/video/(\d+)").expect("valid video id pattern"));

/// Platform-assigned numeric video identifier.
///
/// Used for logging and diagnostics only; the lookup API is called with the
/// canonical URL itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video id from the `/video/<digits>` segment of `url`.
///
/// Returns `None` when the URL has no such segment, which callers treat as a
/// terminal failure for the link.
#[must_use]
pub fn extract(url: &CanonicalUrl) -> Option<VideoId> {
    VIDEO_ID_PATTERN
        .captures(url.as_str())
        .map(|caps| VideoId(caps[1].to_owned()))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_digits_after_video_segment() {
        let url = CanonicalUrl::new("https://www.tiktok.com/@user/video/1234567890");
        assert_eq!(extract(&url).unwrap().as_str(), "1234567890");
    }

    #[test]
    fn ignores_query_and_fragment_noise() {
        let url = CanonicalUrl::new(
            "https://www.tiktok.com/@user/video/7010108501519579397?is_from_webapp=1",
        );
        assert_eq!(extract(&url).unwrap().as_str(), "7010108501519579397");
    }

    #[test]
    fn missing_segment_yields_none() {
        assert!(extract(&CanonicalUrl::new("https://www.tiktok.com/@user")).is_none());
        assert!(extract(&CanonicalUrl::new("https://www.tiktok.com/video/")).is_none());
        assert!(extract(&CanonicalUrl::new("https://www.tiktok.com/video/abc")).is_none());
    }
}
