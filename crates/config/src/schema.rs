use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokgrabConfig {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub downloader: DownloaderConfig,
}

/// Health listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0" so hosting platforms can
    /// reach the liveness probe.
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 10000,
        }
    }
}

/// Telegram front-end configuration.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub token: Secret<String>,
    /// Locale for user-facing replies ("my", "en").
    pub locale: String,
}

impl TelegramConfig {
    /// Whether a token has been supplied at all.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("locale", &self.locale)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            locale: "my".into(),
        }
    }
}

/// Rendition download configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// Base URL of the lookup service.
    pub api_base: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            api_base: "https://tikwm.com".into(),
        }
    }
}
