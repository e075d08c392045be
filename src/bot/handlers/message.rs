use std::sync::Arc;

use teloxide::utils::html;

use crate::bot::commands::Command;
use crate::bot::gateway::ChatGateway;
use crate::bot::handlers::{
    admin, deliver_movie, BotHandler, HandlerResult, IncomingText, Interaction, VideoUpload,
    NOT_FOUND_TEXT,
};
use crate::bot::keyboards;
use crate::bot::session::{reset, CatalogDialogue, PendingAction};
use crate::database::models::Movie;
use crate::utils::feedback::Feedback;
use crate::utils::logging::{log_action_start, log_action_success};

pub const WELCOME_TEXT: &str = "🎬 Welcome to the movie catalog!";
pub const ADMIN_PANEL_TEXT: &str = "👑 Admin panel:";

pub async fn handle_command(
    handler: Arc<BotHandler>,
    gateway: Arc<dyn ChatGateway>,
    dialogue: CatalogDialogue,
    pending: PendingAction,
    who: Interaction,
    cmd: Command,
) -> HandlerResult {
    let feedback = Feedback::new(gateway.as_ref(), who.chat_id);

    match cmd {
        Command::Start => {
            gateway
                .send_markup(who.chat_id, WELCOME_TEXT, keyboards::main_menu().into())
                .await?;
        }
        Command::Help => {
            gateway.send_text(who.chat_id, &BotHandler::help_text()).await?;
        }
        Command::Admin => {
            if !handler.is_admin(&who) {
                feedback.error("You are not an admin.").await?;
                return Ok(());
            }
            reset(&dialogue).await?;
            gateway
                .send_markup(who.chat_id, ADMIN_PANEL_TEXT, keyboards::admin_menu().into())
                .await?;
        }
        Command::Cancel => {
            if pending == PendingAction::Idle {
                feedback.info("Nothing to cancel.").await?;
            } else {
                reset(&dialogue).await?;
                feedback.info("Cancelled.").await?;
            }
        }
    }
    Ok(())
}

/// Free text: unknown commands are rejected, then admin flows run, then the
/// movie lookup by code and by title.
pub async fn handle_text(
    handler: Arc<BotHandler>,
    gateway: Arc<dyn ChatGateway>,
    dialogue: CatalogDialogue,
    pending: PendingAction,
    who: Interaction,
    IncomingText(text): IncomingText,
) -> HandlerResult {
    if text.starts_with('/') {
        let cmd = text.split_whitespace().next().unwrap_or(&text);
        let reply = format!("Unknown command: {cmd}\n\nUse /help to see all available commands.");
        gateway.send_text(who.chat_id, &reply).await?;
        return Ok(());
    }

    if handler.is_admin(&who)
        && admin::handle_admin_text(&handler, gateway.as_ref(), &dialogue, pending, &who, &text)
            .await?
    {
        return Ok(());
    }

    lookup_movies(&handler, gateway.as_ref(), &who, &text).await
}

pub async fn lookup_movies(
    handler: &BotHandler,
    gateway: &dyn ChatGateway,
    who: &Interaction,
    text: &str,
) -> HandlerResult {
    log_action_start("lookup", who.user_id, Some(text));

    if let Some(movie) = Movie::find_by_code(&handler.db.pool, text).await? {
        deliver_movie(handler, gateway, who.chat_id, &movie).await?;
        log_action_success("lookup", who.user_id, Some(&format!("code {}", movie.code)));
        return Ok(());
    }

    let results = Movie::search(&handler.db.pool, text).await?;
    if results.is_empty() {
        Feedback::new(gateway, who.chat_id).error(NOT_FOUND_TEXT).await?;
        return Ok(());
    }

    for movie in &results {
        gateway.send_video(who.chat_id, &movie.file_id, &movie.title).await?;
    }
    log_action_success(
        "lookup",
        who.user_id,
        Some(&format!("{} title match(es)", results.len())),
    );
    Ok(())
}

/// Replies to admins with the file id of an uploaded video.
pub async fn handle_video(
    handler: Arc<BotHandler>,
    gateway: Arc<dyn ChatGateway>,
    who: Interaction,
    video: VideoUpload,
) -> HandlerResult {
    if !handler.is_admin(&who) {
        tracing::debug!("Ignoring video from non-admin {}", who.user_id);
        return Ok(());
    }

    let text = format!("🎬 file_id: {}", html::code_inline(&video.file_id));
    gateway.send_html(who.chat_id, &text).await?;
    Ok(())
}
