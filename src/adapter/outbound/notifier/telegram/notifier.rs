//! Telegram notifier.
//!
//! Requires the `telegram` feature to be enabled.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode, Recipient,
};
use tracing::{debug, info};
use url::Url;

use super::format::format_caption;
use crate::domain::{ChatTarget, Listing};
use crate::error::Result;
use crate::port::Notifier;

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Label of the inline button linking to the item page.
    pub button_label: String,
}

/// Telegram notifier that posts listing alerts to chats and channels.
pub struct TelegramNotifier {
    bot: Bot,
    button_label: String,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        info!("Telegram notifier ready");
        Self {
            bot: Bot::new(config.bot_token),
            button_label: config.button_label,
        }
    }

    fn keyboard(&self, listing: &Listing) -> Option<InlineKeyboardMarkup> {
        let url = Url::parse(listing.detail_url()).ok()?;
        Some(InlineKeyboardMarkup::new([[InlineKeyboardButton::url(
            self.button_label.clone(),
            url,
        )]]))
    }
}

/// Map a chat target to a Telegram recipient.
fn recipient(chat: &ChatTarget) -> Recipient {
    match chat.numeric_id() {
        Some(id) => Recipient::Id(ChatId(id)),
        None => Recipient::ChannelUsername(chat.as_str().to_string()),
    }
}

/// Image to attach, if the listing has a usable one.
fn photo_url(listing: &Listing) -> Option<Url> {
    if listing.image_url().is_empty() {
        return None;
    }
    Url::parse(listing.image_url()).ok()
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, chat: &ChatTarget, listing: &Listing, price_text: &str) -> Result<()> {
        let caption = format_caption(listing, price_text);
        let keyboard = self.keyboard(listing);

        match photo_url(listing) {
            Some(photo) => {
                let mut request = self
                    .bot
                    .send_photo(recipient(chat), InputFile::url(photo))
                    .caption(caption)
                    .parse_mode(ParseMode::Html);
                if let Some(keyboard) = keyboard {
                    request = request.reply_markup(keyboard);
                }
                request.await?;
            }
            None => {
                debug!(inscription = %listing.external_id(), "No usable image, sending text alert");
                let mut request = self
                    .bot
                    .send_message(recipient(chat), caption)
                    .parse_mode(ParseMode::Html);
                if let Some(keyboard) = keyboard {
                    request = request.reply_markup(keyboard);
                }
                request.await?;
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
