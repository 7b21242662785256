//! Telegram front end for tokgrab.
//!
//! Long-polls the Bot API with teloxide, hands inbound message text to the
//! download pipeline, and presents per-link progress as an edit-in-place
//! "processing" message that becomes the terminal outcome.

pub mod bot;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod outbound;

pub use {
    bot::start_polling,
    error::{Error, Result},
    messages::Messages,
    outbound::TelegramSink,
};
