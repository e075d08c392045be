//! Admin panel: menu labels and the multi-step text flows.
//!
//! Selecting a flow label stores a [`PendingAction`]; the admin's next free
//! text is the payload. Invalid payloads keep the action pending so the admin
//! can resend. Menu labels always win over a pending payload.

use teloxide::types::ChatId;

use crate::bot::gateway::ChatGateway;
use crate::bot::handlers::{BotHandler, HandlerError, HandlerResult, Interaction};
use crate::bot::keyboards::AdminMenu;
use crate::bot::session::{reset, set_pending, CatalogDialogue, PendingAction};
use crate::database::models::{BotUser, CatalogStats, Category, Movie};
use crate::utils::feedback::Feedback;
use crate::utils::logging::{
    log_action_start, log_action_success, log_broadcast_summary, log_database_operation,
    log_validation_error,
};
use crate::utils::validation::{
    parse_movie_payload, validate_broadcast_text, validate_category_name, validate_movie_code,
    MOVIE_PAYLOAD_FORMAT,
};

pub const TOP_MOVIES_LIMIT: i64 = 10;

/// Returns `true` when the text was consumed by the admin panel.
pub async fn handle_admin_text(
    handler: &BotHandler,
    gateway: &dyn ChatGateway,
    dialogue: &CatalogDialogue,
    pending: PendingAction,
    who: &Interaction,
    text: &str,
) -> Result<bool, HandlerError> {
    if let Some(item) = AdminMenu::from_label(text) {
        select_menu_item(handler, gateway, dialogue, who, item).await?;
        return Ok(true);
    }

    let flow = FlowInput { handler, gateway, dialogue, who, text };
    match pending {
        PendingAction::Idle => return Ok(false),
        PendingAction::AwaitingMovieAdd => add_movie(flow).await?,
        PendingAction::AwaitingMovieDelete => delete_movie(flow).await?,
        PendingAction::AwaitingCategoryAdd => add_category(flow).await?,
        PendingAction::AwaitingCategoryDelete => delete_category(flow).await?,
        PendingAction::AwaitingBroadcast => run_broadcast(flow).await?,
    }
    Ok(true)
}

/// The payload of a pending flow and everything needed to answer it.
struct FlowInput<'a> {
    handler: &'a BotHandler,
    gateway: &'a dyn ChatGateway,
    dialogue: &'a CatalogDialogue,
    who: &'a Interaction,
    text: &'a str,
}

async fn select_menu_item(
    handler: &BotHandler,
    gateway: &dyn ChatGateway,
    dialogue: &CatalogDialogue,
    who: &Interaction,
    item: AdminMenu,
) -> HandlerResult {
    let (pending, prompt) = match item {
        AdminMenu::Statistics => return send_statistics(handler, gateway, who.chat_id).await,
        AdminMenu::TopMovies => return send_top_movies(handler, gateway, who.chat_id).await,
        AdminMenu::AddMovie => (
            PendingAction::AwaitingMovieAdd,
            format!("📝 Send the movie as: {MOVIE_PAYLOAD_FORMAT}"),
        ),
        AdminMenu::DeleteMovie => (
            PendingAction::AwaitingMovieDelete,
            "🗑 Send the code of the movie to delete.".to_string(),
        ),
        AdminMenu::AddCategory => (
            PendingAction::AwaitingCategoryAdd,
            "➕ Send the new category name.".to_string(),
        ),
        AdminMenu::DeleteCategory => (
            PendingAction::AwaitingCategoryDelete,
            "❌ Send the name of the category to delete.".to_string(),
        ),
        AdminMenu::Broadcast => (
            PendingAction::AwaitingBroadcast,
            "✉️ Send the message text to broadcast.".to_string(),
        ),
    };

    set_pending(dialogue, pending).await?;
    tracing::debug!("Admin {} is now {:?}", who.user_id, pending);
    gateway.send_text(who.chat_id, &prompt).await?;
    Ok(())
}

async fn send_statistics(handler: &BotHandler, gateway: &dyn ChatGateway, chat_id: ChatId) -> HandlerResult {
    let stats = CatalogStats::collect(&handler.db.pool).await?;
    let text = format!(
        "👥 Users: {}\n🎥 Movies: {}\n🗂 Categories: {}",
        stats.users, stats.movies, stats.categories
    );
    gateway.send_text(chat_id, &text).await?;
    Ok(())
}

async fn send_top_movies(handler: &BotHandler, gateway: &dyn ChatGateway, chat_id: ChatId) -> HandlerResult {
    let movies = Movie::top(&handler.db.pool, TOP_MOVIES_LIMIT).await?;
    if movies.is_empty() {
        Feedback::new(gateway, chat_id).info("No movies yet.").await?;
        return Ok(());
    }

    let mut text = String::from("🏆 Top movies:\n\n");
    for movie in &movies {
        text.push_str(&format!("🎬 {} - {} views\n", movie.title, movie.views));
    }
    gateway.send_text(chat_id, &text).await?;
    Ok(())
}

async fn add_movie(flow: FlowInput<'_>) -> HandlerResult {
    let FlowInput { handler, gateway, dialogue, who, text } = flow;
    let feedback = Feedback::new(gateway, who.chat_id);

    let payload = match parse_movie_payload(text) {
        Ok(payload) => payload,
        Err(e) => {
            log_validation_error("add_movie", text, &e.to_string(), who.user_id);
            feedback
                .validation_error(&e.to_string(), &format!("Format: {MOVIE_PAYLOAD_FORMAT}"))
                .await?;
            return Ok(());
        }
    };

    log_action_start("add_movie", who.user_id, Some(&payload.code));
    let movie = Movie::upsert(
        &handler.db.pool,
        &payload.code,
        &payload.file_id,
        &payload.title,
        &payload.category,
    )
    .await?;
    log_database_operation("UPSERT", "movies", Some(&movie.code));

    reset(dialogue).await?;
    feedback.success(&format!("Added: {}", movie.title)).await?;
    log_action_success("add_movie", who.user_id, Some(&movie.code));
    Ok(())
}

async fn delete_movie(flow: FlowInput<'_>) -> HandlerResult {
    let FlowInput { handler, gateway, dialogue, who, text } = flow;
    let feedback = Feedback::new(gateway, who.chat_id);

    let code = match validate_movie_code(text) {
        Ok(code) => code,
        Err(e) => {
            log_validation_error("delete_movie", text, &e.to_string(), who.user_id);
            feedback.validation_error(&e.to_string(), "Send the movie code.").await?;
            return Ok(());
        }
    };

    let removed = Movie::delete(&handler.db.pool, &code).await?;
    log_database_operation("DELETE", "movies", Some(&code));

    reset(dialogue).await?;
    if removed {
        feedback.removed(&format!("Deleted: {code}")).await?;
    } else {
        feedback.info(&format!("No movie with code {code}.")).await?;
    }
    log_action_success("delete_movie", who.user_id, Some(&code));
    Ok(())
}

async fn add_category(flow: FlowInput<'_>) -> HandlerResult {
    let FlowInput { handler, gateway, dialogue, who, text } = flow;
    let feedback = Feedback::new(gateway, who.chat_id);

    let name = match validate_category_name(text) {
        Ok(name) => name,
        Err(e) => {
            log_validation_error("add_category", text, &e.to_string(), who.user_id);
            feedback.validation_error(&e.to_string(), "Send the category name.").await?;
            return Ok(());
        }
    };

    let created = Category::create(&handler.db.pool, &name).await?;
    log_database_operation("INSERT", "categories", Some(&name));

    reset(dialogue).await?;
    if created {
        feedback.success(&format!("Category added: {name}")).await?;
    } else {
        feedback.info(&format!("Category already exists: {name}")).await?;
    }
    log_action_success("add_category", who.user_id, Some(&name));
    Ok(())
}

async fn delete_category(flow: FlowInput<'_>) -> HandlerResult {
    let FlowInput { handler, gateway, dialogue, who, text } = flow;
    let feedback = Feedback::new(gateway, who.chat_id);

    let name = match validate_category_name(text) {
        Ok(name) => name,
        Err(e) => {
            log_validation_error("delete_category", text, &e.to_string(), who.user_id);
            feedback.validation_error(&e.to_string(), "Send the category name.").await?;
            return Ok(());
        }
    };

    let removed = Category::delete(&handler.db.pool, &name).await?;
    log_database_operation("DELETE", "categories", Some(&name));

    reset(dialogue).await?;
    if removed {
        feedback.removed(&format!("Category deleted: {name}")).await?;
    } else {
        feedback.info(&format!("No category named {name}.")).await?;
    }
    log_action_success("delete_category", who.user_id, Some(&name));
    Ok(())
}

async fn run_broadcast(flow: FlowInput<'_>) -> HandlerResult {
    let FlowInput { handler, gateway, dialogue, who, text } = flow;
    let feedback = Feedback::new(gateway, who.chat_id);

    let message = match validate_broadcast_text(text) {
        Ok(message) => message,
        Err(e) => {
            log_validation_error("broadcast", text, &e.to_string(), who.user_id);
            feedback.validation_error(&e.to_string(), "Send the message text.").await?;
            return Ok(());
        }
    };

    reset(dialogue).await?;
    log_action_start("broadcast", who.user_id, None);

    let report = broadcast(handler, gateway, &message).await?;
    log_broadcast_summary(who.user_id, report.delivered, report.failed);

    feedback
        .success(&format!(
            "Message sent! Delivered: {}, failed: {}",
            report.delivered, report.failed
        ))
        .await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Sends `text` to every stored user, one after another. A failed delivery
/// is logged and counted; it never stops the loop.
pub async fn broadcast(
    handler: &BotHandler,
    gateway: &dyn ChatGateway,
    text: &str,
) -> Result<BroadcastReport, sqlx::Error> {
    let recipients = BotUser::list_ids(&handler.db.pool).await?;
    let mut report = BroadcastReport::default();

    for user_id in recipients {
        match gateway.send_text(ChatId(user_id), text).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                tracing::warn!("Broadcast delivery to {} failed: {}", user_id, e);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
