use std::error::Error as StdError;

use thiserror::Error;

/// Which of the two user-facing failure replies an error maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The upstream lookup rejected the link, or the link carried no video id.
    Api,
    /// Transport-level failure: timeout, DNS, connection reset, malformed body.
    General,
}

impl FailureKind {
    /// Stable tag used in logs and by the front end to pick the reply text.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api_error",
            Self::General => "general_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Redirect resolution of a short link failed.
    #[error("could not resolve short link: {source}")]
    Resolution {
        #[source]
        source: reqwest::Error,
    },

    /// The canonical URL has no `/video/<digits>` segment.
    #[error("no video id in canonical URL: {url}")]
    IdentifierNotFound { url: String },

    /// The lookup service returned a non-success envelope or HTTP status.
    #[error("lookup API rejected the request: {reason}")]
    Api { reason: String },

    /// Anything else that went wrong while fetching.
    #[error("{context}: {source}")]
    General {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl DownloadError {
    #[must_use]
    pub fn api(reason: impl Into<String>) -> Self {
        Self::Api {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn general<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::General {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Map this error onto the user-facing failure taxonomy.
    ///
    /// A missing video id reads like an upstream rejection to the user, so it
    /// reports as [`FailureKind::Api`].
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::IdentifierNotFound { .. } | Self::Api { .. } => FailureKind::Api,
            Self::Resolution { .. } | Self::General { .. } => FailureKind::General,
        }
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;
