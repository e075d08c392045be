//! Outbound chat-platform calls used by the dispatcher.
//!
//! Handlers talk to [`ChatGateway`] instead of [`Bot`] directly so the
//! interaction flows can run against a recording fake in tests.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, InputFile, ParseMode, Recipient, ReplyMarkup};
use teloxide::RequestError;

#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), RequestError>;

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<(), RequestError>;

    async fn send_markup(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: ReplyMarkup,
    ) -> Result<(), RequestError>;

    async fn send_video(
        &self,
        chat_id: ChatId,
        file_id: &str,
        caption: &str,
    ) -> Result<(), RequestError>;

    async fn answer_callback(&self, callback_id: &str) -> Result<(), RequestError>;

    async fn member_status(
        &self,
        channel: Recipient,
        user_id: UserId,
    ) -> Result<ChatMemberStatus, RequestError>;
}

/// [`ChatGateway`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), RequestError> {
        self.bot.send_message(chat_id, text).await?;
        Ok(())
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<(), RequestError> {
        self.bot
            .send_message(chat_id, html)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn send_markup(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: ReplyMarkup,
    ) -> Result<(), RequestError> {
        self.bot
            .send_message(chat_id, text)
            .reply_markup(markup)
            .await?;
        Ok(())
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        file_id: &str,
        caption: &str,
    ) -> Result<(), RequestError> {
        self.bot
            .send_video(chat_id, InputFile::file_id(file_id))
            .caption(caption)
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), RequestError> {
        self.bot.answer_callback_query(callback_id).await?;
        Ok(())
    }

    async fn member_status(
        &self,
        channel: Recipient,
        user_id: UserId,
    ) -> Result<ChatMemberStatus, RequestError> {
        let member = self.bot.get_chat_member(channel, user_id).await?;
        Ok(member.kind.status())
    }
}
