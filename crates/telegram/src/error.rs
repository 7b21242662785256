use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Telegram(#[from] teloxide::RequestError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        teloxide::{ApiError, RequestError},
    };

    #[test]
    fn message_variant_displays_the_text() {
        let err = Error::message("no bot configured");
        assert_eq!(err.to_string(), "no bot configured");
    }

    #[test]
    fn request_errors_convert_transparently() {
        let source = RequestError::Api(ApiError::BotBlocked);
        let rendered = source.to_string();
        let err: Error = source.into();
        assert!(matches!(err, Error::Telegram(_)));
        assert_eq!(err.to_string(), rendered);
    }
}
