use std::path::PathBuf;

use {
    clap::Parser,
    tokio_util::sync::CancellationToken,
    tracing::{error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    tokgrab_health::HealthState,
    tokgrab_pipeline::{HttpDownloader, Pipeline},
    tokgrab_telegram::Messages,
};

#[derive(Parser)]
#[command(
    name = "tokgrab",
    about = "Telegram bot that fetches watermark-free TikTok videos"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Address for the health listener (overrides config value).
    #[arg(long)]
    bind: Option<String>,

    /// Port for the health listener (overrides config value).
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Bot token (overrides config value and BOT_TOKEN).
    #[arg(long)]
    token: Option<String>,

    /// Reply locale, e.g. "my" or "en" (overrides config value).
    #[arg(long)]
    locale: Option<String>,

    /// Load config from this file instead of the standard locations.
    #[arg(long, env = "TOKGRAB_CONFIG")]
    config: Option<PathBuf>,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "tokgrab starting");

    let mut config = match cli.config {
        Some(ref path) => {
            let mut cfg = tokgrab_config::load_config(path)?;
            tokgrab_config::apply_env_overrides(&mut cfg);
            cfg
        },
        None => tokgrab_config::discover_and_load(),
    };

    // CLI args override config and environment.
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(token) = cli.token {
        config.telegram.token = secrecy::Secret::new(token);
    }
    if let Some(locale) = cli.locale {
        config.telegram.locale = locale;
    }

    anyhow::ensure!(
        config.telegram.has_token(),
        "no bot token configured; set BOT_TOKEN, telegram.token in tokgrab.toml, or --token"
    );

    // Health listener: independent task, shares nothing with the pipeline.
    let health_cancel = CancellationToken::new();
    {
        let state = HealthState {
            locale: config.telegram.locale.clone(),
            message_keys: Messages::KEYS.iter().map(|k| (*k).to_string()).collect(),
        };
        let bind = config.server.bind.clone();
        let port = config.server.port;
        let cancel = health_cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokgrab_health::serve(&bind, port, state, cancel).await {
                error!(error = %e, "health listener failed");
            }
        });
    }

    let downloader = HttpDownloader::new(reqwest::Client::new())
        .with_api_base(config.downloader.api_base.clone());
    let poll_cancel =
        tokgrab_telegram::start_polling(&config.telegram, Pipeline::new(downloader)).await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
        _ = poll_cancel.cancelled() => warn!("polling loop stopped, shutting down"),
    }

    poll_cancel.cancel();
    health_cancel.cancel();
    Ok(())
}
