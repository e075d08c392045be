use std::sync::Arc;

use teloxide::types::CallbackQuery;

use crate::bot::gateway::ChatGateway;
use crate::bot::handlers::{deliver_movie, BotHandler, HandlerResult, Interaction, NOT_FOUND_TEXT};
use crate::bot::keyboards::{self, CallbackAction};
use crate::database::models::{Category, Movie};
use crate::utils::feedback::Feedback;

pub const SEARCH_PROMPT_TEXT: &str = "🔎 Send a movie title or code.";
pub const INFO_TEXT: &str =
    "ℹ️ Movie catalog bot. Browse movies and categories from the menu, or send a movie code or title.";

/// Handles a menu button. The query itself was already answered.
pub async fn handle_callback(
    handler: Arc<BotHandler>,
    gateway: Arc<dyn ChatGateway>,
    who: Interaction,
    q: CallbackQuery,
) -> HandlerResult {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let gateway = gateway.as_ref();

    tracing::info!(
        "Callback received: '{}' from user {} in chat {}",
        data, who.user_id, who.chat_id.0
    );

    let feedback = Feedback::new(gateway, who.chat_id);
    let pool = &handler.db.pool;

    let Some(action) = CallbackAction::parse(data) else {
        feedback.error("Unknown action.").await?;
        return Ok(());
    };

    match action {
        CallbackAction::Movies => {
            let movies = Movie::list_all(pool).await?;
            if movies.is_empty() {
                feedback.info("No movies yet.").await?;
            } else {
                gateway
                    .send_markup(who.chat_id, "🎬 Movies:", keyboards::movie_list(&movies).into())
                    .await?;
            }
        }
        CallbackAction::Categories => {
            let categories = Category::list_all(pool).await?;
            if categories.is_empty() {
                feedback.info("No categories yet.").await?;
            } else {
                gateway
                    .send_markup(
                        who.chat_id,
                        "🗂 Categories:",
                        keyboards::category_list(&categories).into(),
                    )
                    .await?;
            }
        }
        CallbackAction::Category(name) => {
            let movies = Movie::list_by_category(pool, &name).await?;
            if movies.is_empty() {
                feedback.info("No movies in this category.").await?;
            } else {
                gateway
                    .send_markup(
                        who.chat_id,
                        &format!("🎬 Movies in {name}:"),
                        keyboards::movie_list(&movies).into(),
                    )
                    .await?;
            }
        }
        CallbackAction::Movie(code) => match Movie::find_by_code(pool, &code).await? {
            Some(movie) => deliver_movie(&handler, gateway, who.chat_id, &movie).await?,
            None => feedback.error(NOT_FOUND_TEXT).await?,
        },
        CallbackAction::Search => {
            gateway.send_text(who.chat_id, SEARCH_PROMPT_TEXT).await?;
        }
        CallbackAction::Info => {
            gateway.send_text(who.chat_id, INFO_TEXT).await?;
        }
    }

    Ok(())
}
