//! Bot startup and the manual long-polling loop.

use std::sync::Arc;

use {
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand, UpdateKind},
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use {
    tokgrab_config::TelegramConfig,
    tokgrab_pipeline::{Downloader, Pipeline},
};

use crate::{error::Result, handlers, messages::Messages};

/// Start polling for updates.
///
/// Spawns a background task that processes updates until the returned
/// `CancellationToken` is cancelled. Each inbound message is handled as its
/// own task so one message's downloads never block another's.
pub async fn start_polling<D>(
    config: &TelegramConfig,
    pipeline: Pipeline<D>,
) -> Result<CancellationToken>
where
    D: Downloader + 'static,
{
    // Client timeout must exceed the long-polling timeout (30s) so the HTTP
    // client doesn't abort the request before Telegram responds.
    let client = teloxide::net::default_reqwest_settings()
        .timeout(std::time::Duration::from_secs(45))
        .build()?;
    let bot = Bot::with_client(config.token.expose_secret(), client);

    // Verify credentials before anything else.
    let me = bot.get_me().await?;

    // Delete any existing webhook so long polling works, and drop updates
    // queued while the bot was down so a restart never replays old links.
    bot.delete_webhook()
        .drop_pending_updates(true)
        .send()
        .await?;

    // Register slash commands for autocomplete in Telegram clients.
    let commands = vec![
        BotCommand::new("start", "What this bot does"),
        BotCommand::new("help", "How to use the bot"),
        BotCommand::new("language", "Reply language info"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!("failed to register bot commands: {e}");
    }

    info!(
        username = ?me.username,
        locale = config.locale,
        "telegram bot connected (webhook cleared)"
    );

    let cancel = CancellationToken::new();
    let state = Arc::new(handlers::BotState {
        bot: bot.clone(),
        messages: Messages::for_locale(&config.locale),
        pipeline,
    });

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        info!("starting telegram polling loop");
        let mut offset: i32 = 0;

        loop {
            if cancel_clone.is_cancelled() {
                info!("telegram polling stopped");
                break;
            }

            let result = bot
                .get_updates()
                .offset(offset)
                .timeout(30)
                .allowed_updates(vec![AllowedUpdate::Message])
                .await;

            match result {
                Ok(updates) => {
                    debug!(count = updates.len(), "got telegram updates");
                    for update in updates {
                        offset = update.id.as_offset();
                        match update.kind {
                            UpdateKind::Message(msg) => {
                                // Independent task per message: a slow
                                // download must not stall the poll loop.
                                let state = Arc::clone(&state);
                                tokio::spawn(async move {
                                    let chat_id = msg.chat.id.0;
                                    if let Err(e) =
                                        handlers::handle_message(msg, &state).await
                                    {
                                        error!(
                                            chat_id,
                                            error = %e,
                                            "error handling telegram message"
                                        );
                                    }
                                });
                            },
                            other => {
                                debug!("ignoring non-message update: {other:?}");
                            },
                        }
                    }
                },
                Err(e) => {
                    // Conflict: another bot instance is polling with this token.
                    if matches!(&e, RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) {
                        warn!(
                            "telegram bot stopping: another instance is already \
                             running with this token"
                        );
                        cancel_clone.cancel();
                        break;
                    }

                    warn!(error = %e, "telegram getUpdates failed");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                },
            }
        }
    });

    Ok(cancel)
}
