//! Telegram implementation of the pipeline's progress sink.
//!
//! The "processing" reply's message id is the correlation handle: the
//! terminal outcome edits that message in place, so the user never sees a
//! hanging acknowledgment.

use {
    async_trait::async_trait,
    teloxide::{
        payloads::{SendMessageSetters, SendVideoSetters},
        prelude::*,
        types::{ChatId, InputFile, MessageId, ReplyParameters},
    },
    tracing::{debug, info},
};

use tokgrab_pipeline::{FailureKind, Link, LinkOutcome, MediaPayload, ProgressSink};

use crate::{error::Result, messages::Messages};

/// Per-message sink: all notifications for one inbound chat message go to
/// its chat, threaded under the triggering message.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
    reply_to: MessageId,
    messages: &'static Messages,
}

impl TelegramSink {
    #[must_use]
    pub fn new(bot: Bot, chat_id: ChatId, reply_to: MessageId, messages: &'static Messages) -> Self {
        Self {
            bot,
            chat_id,
            reply_to,
            messages,
        }
    }

    async fn send_processing(&self, link: &Link) -> Result<MessageId> {
        debug!(link = %link, chat_id = self.chat_id.0, "sending processing notice");
        let sent = self
            .bot
            .send_message(self.chat_id, self.messages.processing)
            .reply_parameters(ReplyParameters::new(self.reply_to).allow_sending_without_reply())
            .await?;
        Ok(sent.id)
    }

    async fn deliver(&self, handle: MessageId, payload: MediaPayload) -> Result<()> {
        info!(
            chat_id = self.chat_id.0,
            bytes = payload.bytes.len(),
            filename = %payload.filename,
            "sending rendition"
        );
        let video = InputFile::memory(payload.bytes).file_name(payload.filename);
        self.bot
            .send_video(self.chat_id, video)
            .caption(self.messages.caption)
            .supports_streaming(true)
            .await?;
        self.bot
            .edit_message_text(self.chat_id, handle, self.messages.success)
            .await?;
        Ok(())
    }

    async fn report_failure(&self, handle: MessageId, kind: FailureKind) -> Result<()> {
        let text = match kind {
            FailureKind::Api => self.messages.api_error,
            FailureKind::General => self.messages.general_error,
        };
        self.bot
            .edit_message_text(self.chat_id, handle, text)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressSink for TelegramSink {
    type Handle = MessageId;

    async fn processing(&self, link: &Link) -> anyhow::Result<MessageId> {
        Ok(self.send_processing(link).await?)
    }

    async fn completed(&self, handle: MessageId, outcome: LinkOutcome) -> anyhow::Result<()> {
        match outcome {
            LinkOutcome::Delivered(payload) => self.deliver(handle, payload).await?,
            LinkOutcome::Failed(kind) => self.report_failure(handle, kind).await?,
        }
        Ok(())
    }
}
