use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::schema::TokgrabConfig;

/// Standard config file name.
const CONFIG_FILENAME: &str = "tokgrab.toml";

/// Load config from the given path.
pub fn load_config(path: &Path) -> anyhow::Result<TokgrabConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Discover and load config from standard locations, then apply environment
/// overrides.
///
/// Search order:
/// 1. `./tokgrab.toml` (project-local)
/// 2. `~/.config/tokgrab/tokgrab.toml` (user-global)
///
/// Falls back to [`TokgrabConfig::default`] when no file is found or the file
/// fails to parse.
#[must_use]
pub fn discover_and_load() -> TokgrabConfig {
    let mut cfg = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            match load_config(&path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                    TokgrabConfig::default()
                },
            }
        },
        None => {
            debug!("no config file found, using defaults");
            TokgrabConfig::default()
        },
    };
    apply_env_overrides(&mut cfg);
    cfg
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "tokgrab") {
        let global = dirs.config_dir().join(CONFIG_FILENAME);
        if global.exists() {
            return Some(global);
        }
    }

    None
}

/// Apply process-environment overrides to `cfg`.
///
/// `BOT_TOKEN` and `PORT` keep their names from the original deployment;
/// tokgrab-specific knobs are namespaced.
pub fn apply_env_overrides(cfg: &mut TokgrabConfig) {
    apply_env_overrides_with(cfg, |name| std::env::var(name).ok());
}

/// Implementation behind [`apply_env_overrides`]; the injected lookup makes
/// this testable without mutating the process environment.
fn apply_env_overrides_with(cfg: &mut TokgrabConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(token) = lookup("BOT_TOKEN") {
        cfg.telegram.token = Secret::new(token);
    }
    if let Some(port) = lookup("PORT") {
        match port.parse::<u16>() {
            Ok(port) => cfg.server.port = port,
            Err(_) => warn!(%port, "ignoring non-numeric PORT override"),
        }
    }
    if let Some(locale) = lookup("TOKGRAB_LOCALE") {
        cfg.telegram.locale = locale;
    }
    if let Some(api_base) = lookup("TOKGRAB_API_BASE") {
        cfg.downloader.api_base = api_base;
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, std::io::Write};

    #[test]
    fn loads_a_full_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
            [server]
            bind = "127.0.0.1"
            port = 8080

            [telegram]
            token = "123:ABC"
            locale = "en"

            [downloader]
            api_base = "https://tikwm.example"
            "#
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.telegram.token.expose_secret(), "123:ABC");
        assert_eq!(cfg.downloader.api_base, "https://tikwm.example");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/tokgrab.toml")).is_err());
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut cfg = TokgrabConfig::default();
        apply_env_overrides_with(&mut cfg, |name| match name {
            "BOT_TOKEN" => Some("456:DEF".into()),
            "PORT" => Some("9999".into()),
            "TOKGRAB_LOCALE" => Some("en".into()),
            _ => None,
        });
        assert_eq!(cfg.telegram.token.expose_secret(), "456:DEF");
        assert_eq!(cfg.server.port, 9999);
        assert_eq!(cfg.telegram.locale, "en");
        // Untouched knobs keep their defaults.
        assert_eq!(cfg.downloader.api_base, "https://tikwm.com");
    }

    #[test]
    fn bad_port_override_is_ignored() {
        let mut cfg = TokgrabConfig::default();
        apply_env_overrides_with(&mut cfg, |name| {
            (name == "PORT").then(|| "not-a-port".into())
        });
        assert_eq!(cfg.server.port, 10000);
    }
}
