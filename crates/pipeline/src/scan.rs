//! Link scanner: finds TikTok video links in free-form message text.

use {once_cell::sync::Lazy, regex::Regex};

/// Hosts that serve opaque short links and need redirect resolution.
pub const SHORT_LINK_HOSTS: &[&str] = &["vm.tiktok.com", "vt.tiktok.com"];

// Matches `vm.`/`vt.` short links, `www.`, or the bare domain, each followed
// by at least one non-whitespace character.
#[allow(clippy::expect_used)] // literal pattern, compiles
static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:vm|vt|www)\.tiktok\.com/\S+|https?://tiktok\.com/\S+")
        .expect("valid link pattern")
});

/// A TikTok link found in message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    raw: String,
}

impl Link {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The matched URL as it appeared in the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The link's host, when the URL parses.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.raw)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
    }

    /// Whether this is an opaque short link (`vm.` / `vt.` host) that must be
    /// resolved to its canonical landing URL before the id can be extracted.
    #[must_use]
    pub fn is_short_form(&self) -> bool {
        self.host()
            .is_some_and(|host| SHORT_LINK_HOSTS.contains(&host.as_str()))
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Scan `text` for TikTok links, in order of appearance.
///
/// Pure and lazy; duplicates are yielded once per occurrence so each gets its
/// own pipeline run. Empty text yields nothing.
pub fn scan(text: &str) -> impl Iterator<Item = Link> + '_ {
    LINK_PATTERN.find_iter(text).map(|m| Link::new(m.as_str()))
}
