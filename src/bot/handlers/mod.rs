//! Interaction dispatcher.
//!
//! [`schema`] is the dptree tree run by the teloxide `Dispatcher`: it enters
//! the chat's dialogue, records the sender, enforces the subscription gate
//! and routes the update to the command, video, text or callback endpoint.

pub mod admin;
pub mod callback;
pub mod message;

use std::sync::Arc;

use teloxide::dispatching::{dialogue, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{UpdateKind, User};
use teloxide::utils::command::BotCommands;

use crate::bot::access::{AccessControl, SubscriptionStatus};
use crate::bot::commands::Command;
use crate::bot::gateway::ChatGateway;
use crate::bot::session::{CatalogStorage, PendingAction};
use crate::database::connection::DatabaseManager;
use crate::database::models::{BotUser, Movie};
use crate::utils::logging::log_action_error;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub const NOT_FOUND_TEXT: &str = "Movie not found.";

/// Who triggered an update and where replies go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub user_id: u64,
    pub username: Option<String>,
    pub chat_id: ChatId,
}

impl Interaction {
    pub fn from_user(user: &User, chat_id: ChatId) -> Self {
        Self {
            user_id: user.id.0,
            username: user.username.clone(),
            chat_id,
        }
    }

    /// Messages and callback queries with a known sender; other updates are
    /// not served.
    pub fn from_update(update: &Update) -> Option<Self> {
        match &update.kind {
            UpdateKind::Message(msg) => Some(Self::from_user(msg.from()?, msg.chat.id)),
            UpdateKind::CallbackQuery(q) => {
                let chat_id = q.message.as_ref()?.chat.id;
                Some(Self::from_user(&q.from, chat_id))
            }
            _ => None,
        }
    }
}

/// Trimmed, non-empty message text that is not a known command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingText(pub String);

impl IncomingText {
    pub fn from_message(msg: &Message) -> Option<Self> {
        let text = msg.text()?.trim();
        (!text.is_empty()).then(|| Self(text.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpload {
    pub file_id: String,
}

impl VideoUpload {
    pub fn from_message(msg: &Message) -> Option<Self> {
        msg.video().map(|video| Self {
            file_id: video.file.id.clone(),
        })
    }
}

#[derive(Clone)]
pub struct BotHandler {
    pub db: DatabaseManager,
    pub access: AccessControl,
}

impl BotHandler {
    pub fn new(db: DatabaseManager, access: AccessControl) -> Self {
        Self { db, access }
    }

    /// Records the sender, then checks every configured channel. A failed
    /// upsert is logged and does not deny service.
    pub async fn admit(&self, gateway: &dyn ChatGateway, who: &Interaction) -> SubscriptionStatus {
        if let Err(e) =
            BotUser::touch(&self.db.pool, who.user_id as i64, who.username.as_deref()).await
        {
            log_action_error("record_user", who.user_id, &e.to_string());
        }

        let status = self.access.check_subscription(gateway, who.user_id).await;
        if !status.is_subscribed() {
            tracing::info!("User {} blocked by subscription gate: {:?}", who.user_id, status);
        }
        status
    }

    pub fn is_admin(&self, who: &Interaction) -> bool {
        self.access.is_admin(who.user_id)
    }

    pub fn subscribe_prompt(&self) -> String {
        let channels: Vec<String> = self
            .access
            .channels()
            .iter()
            .map(|c| c.to_string())
            .collect();
        format!(
            "🚫 Please subscribe to our channel(s) first: {}",
            channels.join(", ")
        )
    }

    pub fn help_text() -> String {
        Command::descriptions().to_string()
    }
}

/// Dependencies: `Arc<BotHandler>`, `Arc<dyn ChatGateway>`,
/// `Arc<CatalogStorage>`, plus the `Update` and `Me` the dispatcher injects.
pub fn schema() -> UpdateHandler<HandlerError> {
    let messages = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(message::handle_command),
        )
        .branch(
            dptree::filter_map(|msg: Message| VideoUpload::from_message(&msg))
                .endpoint(message::handle_video),
        )
        .branch(
            dptree::filter_map(|msg: Message| IncomingText::from_message(&msg))
                .endpoint(message::handle_text),
        );

    dialogue::enter::<Update, CatalogStorage, PendingAction, _>()
        .filter_map(|update: Update| Interaction::from_update(&update))
        .inspect_async(acknowledge_callback)
        .map_async(check_access)
        .branch(
            dptree::filter(|status: SubscriptionStatus| !status.is_subscribed())
                .endpoint(send_subscribe_prompt),
        )
        .branch(messages)
        .branch(Update::filter_callback_query().endpoint(callback::handle_callback))
}

/// Callback queries are answered before anything else, even for users the
/// gate turns away.
async fn acknowledge_callback(update: Update, gateway: Arc<dyn ChatGateway>) {
    if let UpdateKind::CallbackQuery(q) = &update.kind {
        if let Err(e) = gateway.answer_callback(&q.id).await {
            tracing::warn!("Failed to answer callback {}: {}", q.id, e);
        }
    }
}

async fn check_access(
    handler: Arc<BotHandler>,
    gateway: Arc<dyn ChatGateway>,
    who: Interaction,
) -> SubscriptionStatus {
    handler.admit(gateway.as_ref(), &who).await
}

async fn send_subscribe_prompt(
    handler: Arc<BotHandler>,
    gateway: Arc<dyn ChatGateway>,
    who: Interaction,
) -> HandlerResult {
    gateway.send_text(who.chat_id, &handler.subscribe_prompt()).await?;
    Ok(())
}

/// Counts the view and sends the movie's video.
pub(crate) async fn deliver_movie(
    handler: &BotHandler,
    gateway: &dyn ChatGateway,
    chat_id: ChatId,
    movie: &Movie,
) -> HandlerResult {
    Movie::increment_views(&handler.db.pool, &movie.code).await?;
    gateway.send_video(chat_id, &movie.file_id, &movie.title).await?;
    Ok(())
}
