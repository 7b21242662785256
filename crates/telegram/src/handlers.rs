//! Inbound message handling: slash commands and link-bearing messages.

use std::sync::Arc;

use {teloxide::prelude::*, tracing::debug};

use tokgrab_pipeline::{Downloader, Pipeline};

use crate::{error::Result, messages::Messages, outbound::TelegramSink};

/// Shared runtime state for the polling loop and handlers.
pub struct BotState<D> {
    pub bot: Bot,
    pub messages: &'static Messages,
    pub pipeline: Pipeline<D>,
}

/// Handle one inbound Telegram message.
///
/// Commands get their localized reply; everything else (text or media
/// caption) is scanned for links and fed through the pipeline. Messages
/// without links are ignored entirely — no reply, per the no-link contract.
pub async fn handle_message<D: Downloader>(
    msg: Message,
    state: &Arc<BotState<D>>,
) -> Result<()> {
    if let Some(command) = msg.text().and_then(command_of) {
        let reply = match command {
            "start" => state.messages.welcome,
            "help" => state.messages.help,
            "language" => state.messages.language_note,
            _ => return Ok(()), // unknown command, stay quiet
        };
        state.bot.send_message(msg.chat.id, reply).await?;
        return Ok(());
    }

    let Some(content) = msg.text().or_else(|| msg.caption()) else {
        return Ok(());
    };

    let sink = TelegramSink::new(state.bot.clone(), msg.chat.id, msg.id, state.messages);
    let processed = state.pipeline.run(content, &sink).await;
    if processed > 0 {
        debug!(chat_id = msg.chat.id.0, processed, "message links handled");
    }
    Ok(())
}

/// Parse a leading slash command, stripping any `@botname` suffix.
fn command_of(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    let command = first.strip_prefix('/')?;
    Some(command.split('@').next().unwrap_or(command))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("/start", Some("start"))]
    #[case("/help extra words", Some("help"))]
    #[case("/language@tokgrab_bot", Some("language"))]
    #[case("https://vm.tiktok.com/x", None)]
    #[case("plain text", None)]
    #[case("", None)]
    fn command_parsing(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(command_of(text), expected);
    }
}
