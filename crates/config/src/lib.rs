//! Configuration loading for tokgrab.
//!
//! Config file: `tokgrab.toml`, searched in `./` then `~/.config/tokgrab/`.
//! Environment variables (`BOT_TOKEN`, `PORT`, `TOKGRAB_LOCALE`,
//! `TOKGRAB_API_BASE`) override file values; CLI flags override both.
//!
//! Everything the process needs — bot token, listener port, locale — lives in
//! one explicit [`TokgrabConfig`] handed to the components that use it; there
//! is no ambient global state.

pub mod loader;
pub mod schema;

pub use {
    loader::{apply_env_overrides, discover_and_load, load_config},
    schema::{DownloaderConfig, ServerConfig, TelegramConfig, TokgrabConfig},
};
