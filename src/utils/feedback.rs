use teloxide::types::ChatId;
use teloxide::RequestError;

use crate::bot::gateway::ChatGateway;

/// Feedback types for different action outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
    Removed,
}

impl FeedbackType {
    pub fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
            FeedbackType::Removed => "🗑",
        }
    }

    pub fn format(&self, message: &str) -> String {
        format!("{} {}", self.emoji(), message)
    }
}

/// Plain-text replies prefixed with an outcome emoji
pub struct Feedback<'a> {
    gateway: &'a dyn ChatGateway,
    chat_id: ChatId,
}

impl<'a> Feedback<'a> {
    pub fn new(gateway: &'a dyn ChatGateway, chat_id: ChatId) -> Self {
        Self { gateway, chat_id }
    }

    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> Result<(), RequestError> {
        self.gateway
            .send_text(self.chat_id, &feedback_type.format(message))
            .await
    }

    pub async fn success(&self, message: &str) -> Result<(), RequestError> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> Result<(), RequestError> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn info(&self, message: &str) -> Result<(), RequestError> {
        self.send(FeedbackType::Info, message).await
    }

    pub async fn removed(&self, message: &str) -> Result<(), RequestError> {
        self.send(FeedbackType::Removed, message).await
    }

    /// Format error with a hint on what to send instead
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> Result<(), RequestError> {
        let message = format!("{error}\n\n💡 {suggestion}");
        self.send(FeedbackType::Warning, &message).await
    }
}
