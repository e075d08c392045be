#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use movie_catalog_bot::bot::access::{AccessControl, ChannelRef};
use movie_catalog_bot::bot::gateway::ChatGateway;
use movie_catalog_bot::bot::handlers::{schema, BotHandler};
use movie_catalog_bot::bot::session::{CatalogDialogue, CatalogStorage, PendingAction};
use movie_catalog_bot::database::connection::DatabaseManager;
use serde_json::json;
use sqlx::SqlitePool;
use teloxide::dptree;
use teloxide::types::{ChatId, ChatMemberStatus, Me, Recipient, ReplyMarkup, Update, UserId};
use teloxide::{ApiError, RequestError};
use tempfile::{tempdir, TempDir};

pub const ADMIN_ID: u64 = 1000;
pub const VIEWER_ID: u64 = 2000;
pub const BOT_ID: u64 = 42;
pub const BOT_USERNAME: &str = "catalog_bot";

static NEXT_UPDATE_ID: AtomicI32 = AtomicI32::new(1);

pub async fn setup_test_db() -> (DatabaseManager, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db = DatabaseManager::new(&database_url)
        .await
        .expect("Failed to create test database");
    db.run_migrations().await.expect("Failed to run migrations");

    (db, temp_dir)
}

pub async fn setup_handler(channels: &[&str]) -> (BotHandler, TempDir) {
    let (db, temp_dir) = setup_test_db().await;
    let channels = channels
        .iter()
        .map(|c| ChannelRef::parse(c).expect("valid channel"))
        .collect();
    let access = AccessControl::new([ADMIN_ID], channels);
    (BotHandler::new(db, access), temp_dir)
}

/// The bot identity `filter_command` matches commands against.
pub fn me() -> Me {
    serde_json::from_value(json!({
        "id": BOT_ID,
        "is_bot": true,
        "first_name": "Catalog",
        "username": BOT_USERNAME,
        "can_join_groups": false,
        "can_read_all_group_messages": false,
        "supports_inline_queries": false
    }))
    .expect("valid bot identity")
}

fn user_json(user_id: u64) -> serde_json::Value {
    if user_id == ADMIN_ID {
        json!({ "id": user_id, "is_bot": false, "first_name": "Boss", "username": "boss" })
    } else {
        json!({ "id": user_id, "is_bot": false, "first_name": "Viewer" })
    }
}

fn private_chat_json(user_id: u64) -> serde_json::Value {
    json!({ "id": user_id, "type": "private", "first_name": "Viewer" })
}

fn update_from(kind: &str, payload: serde_json::Value) -> Update {
    let id = NEXT_UPDATE_ID.fetch_add(1, Ordering::Relaxed);
    // teloxide-core 0.9 only parses `UpdateKind` from borrowed input, so go
    // through a string rather than `from_value`.
    serde_json::from_str(&json!({ "update_id": id, kind: payload }).to_string()).expect("valid update")
}

pub fn text_update(user_id: u64, text: &str) -> Update {
    update_from(
        "message",
        json!({
            "message_id": 10,
            "date": 1700000000,
            "chat": private_chat_json(user_id),
            "from": user_json(user_id),
            "text": text
        }),
    )
}

pub fn video_update(user_id: u64, file_id: &str) -> Update {
    update_from(
        "message",
        json!({
            "message_id": 11,
            "date": 1700000000,
            "chat": private_chat_json(user_id),
            "from": user_json(user_id),
            "video": {
                "file_id": file_id,
                "file_unique_id": "unique-video",
                "width": 640,
                "height": 360,
                "duration": 90,
                "mime_type": "video/mp4"
            }
        }),
    )
}

/// A menu button press on a message the bot sent earlier.
pub fn callback_update(user_id: u64, data: &str) -> Update {
    update_from(
        "callback_query",
        json!({
            "id": "cb-1",
            "from": user_json(user_id),
            "chat_instance": "instance-1",
            "data": data,
            "message": {
                "message_id": 12,
                "date": 1700000000,
                "chat": private_chat_json(user_id),
                "from": { "id": BOT_ID, "is_bot": true, "first_name": "Catalog", "username": BOT_USERNAME },
                "text": "🎬 Welcome to the movie catalog!"
            }
        }),
    )
}

/// Handler, recording gateway and dialogue storage wired the way the
/// dispatcher wires them.
pub struct Harness {
    pub handler: Arc<BotHandler>,
    pub gateway: Arc<FakeGateway>,
    pub storage: Arc<CatalogStorage>,
    _temp_dir: TempDir,
}

impl Harness {
    pub async fn new(channels: &[&str]) -> Self {
        Self::with_gateway(channels, FakeGateway::new()).await
    }

    pub async fn with_gateway(channels: &[&str], gateway: FakeGateway) -> Self {
        let (handler, temp_dir) = setup_handler(channels).await;
        Self {
            handler: Arc::new(handler),
            gateway: Arc::new(gateway),
            storage: CatalogStorage::new(),
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.handler.db.pool
    }

    pub fn chat_gateway(&self) -> Arc<dyn ChatGateway> {
        self.gateway.clone()
    }

    /// Runs one update through the handler tree and fails the test on an
    /// endpoint error or an update no branch accepted.
    pub async fn send(&self, update: Update) {
        let deps = dptree::deps![
            update,
            me(),
            self.handler.clone(),
            self.chat_gateway(),
            self.storage.clone()
        ];
        match schema().dispatch(deps).await {
            ControlFlow::Break(Ok(())) => {}
            ControlFlow::Break(Err(e)) => panic!("handler failed: {e}"),
            ControlFlow::Continue(_) => panic!("update was not handled"),
        }
    }

    pub async fn text(&self, user_id: u64, text: &str) {
        self.send(text_update(user_id, text)).await
    }

    pub async fn callback(&self, user_id: u64, data: &str) {
        self.send(callback_update(user_id, data)).await
    }

    pub async fn video(&self, user_id: u64, file_id: &str) {
        self.send(video_update(user_id, file_id)).await
    }

    pub async fn pending(&self, user_id: u64) -> PendingAction {
        CatalogDialogue::new(self.storage.clone(), ChatId(user_id as i64))
            .get_or_default()
            .await
            .expect("in-memory storage")
    }
}

/// Everything the dispatcher sent through the gateway.
#[derive(Debug, Clone)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Html { chat_id: i64, text: String },
    Markup { chat_id: i64, text: String, markup: ReplyMarkup },
    Video { chat_id: i64, file_id: String, caption: String },
    CallbackAnswer { id: String },
}

/// Recording gateway. Channel statuses default to `Member`; chats listed in
/// `failing_chats` reject deliveries, and `failing_callbacks` makes every
/// callback answer fail.
#[derive(Default)]
pub struct FakeGateway {
    pub sent: Mutex<Vec<Sent>>,
    pub failing_chats: HashSet<i64>,
    pub failing_callbacks: bool,
    pub statuses: HashMap<String, Option<ChatMemberStatus>>,
    pub member_lookups: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(chats: &[i64]) -> Self {
        Self {
            failing_chats: chats.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// `None` makes the lookup for that channel error.
    pub fn with_status(mut self, channel: &str, status: Option<ChatMemberStatus>) -> Self {
        self.statuses.insert(channel.to_string(), status);
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } | Sent::Html { text, .. } | Sent::Markup { text, .. } => {
                    Some(text)
                }
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> String {
        self.texts().pop().unwrap_or_default()
    }

    pub fn videos(&self) -> Vec<(i64, String, String)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Video { chat_id, file_id, caption } => Some((chat_id, file_id, caption)),
                _ => None,
            })
            .collect()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.member_lookups.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn deliver(&self, chat_id: ChatId, sent: Sent) -> Result<(), RequestError> {
        if self.failing_chats.contains(&chat_id.0) {
            return Err(RequestError::Api(ApiError::BotBlocked));
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), RequestError> {
        self.deliver(chat_id, Sent::Text { chat_id: chat_id.0, text: text.to_string() })
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<(), RequestError> {
        self.deliver(chat_id, Sent::Html { chat_id: chat_id.0, text: html.to_string() })
    }

    async fn send_markup(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: ReplyMarkup,
    ) -> Result<(), RequestError> {
        self.deliver(
            chat_id,
            Sent::Markup { chat_id: chat_id.0, text: text.to_string(), markup },
        )
    }

    async fn send_video(
        &self,
        chat_id: ChatId,
        file_id: &str,
        caption: &str,
    ) -> Result<(), RequestError> {
        self.deliver(
            chat_id,
            Sent::Video {
                chat_id: chat_id.0,
                file_id: file_id.to_string(),
                caption: caption.to_string(),
            },
        )
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), RequestError> {
        if self.failing_callbacks {
            return Err(RequestError::Api(ApiError::Unknown(
                "Bad Request: query is too old".to_string(),
            )));
        }
        self.sent
            .lock()
            .unwrap()
            .push(Sent::CallbackAnswer { id: callback_id.to_string() });
        Ok(())
    }

    async fn member_status(
        &self,
        channel: Recipient,
        _user_id: UserId,
    ) -> Result<ChatMemberStatus, RequestError> {
        let key = match channel {
            Recipient::Id(id) => id.0.to_string(),
            Recipient::ChannelUsername(name) => name,
        };
        self.member_lookups.lock().unwrap().push(key.clone());

        match self.statuses.get(&key) {
            None => Ok(ChatMemberStatus::Member),
            Some(Some(status)) => Ok(*status),
            Some(None) => Err(RequestError::Api(ApiError::Unknown(
                "Bad Request: chat not found".to_string(),
            ))),
        }
    }
}
