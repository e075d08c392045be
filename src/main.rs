//! # Movie Catalog Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, registers
//! the webhook and dispatches updates until Ctrl-C.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_catalog_bot::bot::access::AccessControl;
use movie_catalog_bot::bot::gateway::{ChatGateway, TelegramGateway};
use movie_catalog_bot::bot::handlers::{schema, BotHandler};
use movie_catalog_bot::bot::session::CatalogStorage;
use movie_catalog_bot::config::Config;
use movie_catalog_bot::database::connection::DatabaseManager;
use movie_catalog_bot::services::health::HealthService;
use movie_catalog_bot::services::webhook::{
    update_listener, webhook_router, QUEUE_CAPACITY, WEBHOOK_PATH,
};
use movie_catalog_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_catalog_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Movie Catalog Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, Port: {}, Admins: {}, Channels: {}",
        config.database_url,
        config.port,
        config.admins.len(),
        config.channels.len()
    );
    let access = AccessControl::from_config(&config.admins, &config.channels)?;

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await?;
    info!("Running as @{}", me.username());

    let handler = Arc::new(BotHandler::new(db_arc.as_ref().clone(), access));
    let gateway: Arc<dyn ChatGateway> = Arc::new(TelegramGateway::new(bot.clone()));
    let storage = CatalogStorage::new();

    // Webhook receipt is decoupled from processing through a bounded queue
    let (listener, intake, stop_flag) = update_listener(QUEUE_CAPACITY);

    let app = webhook_router(intake, config.webhook_secret.clone())
        .merge(HealthService::new(db_arc.clone()).router)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let tcp_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.port, e))?;
    info!("Listening on port {} (webhook path {})", config.port, WEBHOOK_PATH);

    let mut set_webhook = bot.set_webhook(config.webhook_url.parse()?);
    if let Some(secret) = &config.webhook_secret {
        set_webhook = set_webhook.secret_token(secret.clone());
    }
    set_webhook.await?;
    log_system_event("webhook registered", Some(&config.webhook_url));

    // Stops accepting connections once the dispatcher stops the listener
    let server_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(tcp_listener, app)
            .with_graceful_shutdown(stop_flag)
            .await
        {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![handler, gateway, storage])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the update handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
        )
        .await;
    log_system_event("dispatcher stopped", None);

    if let Err(e) = server_task.await {
        tracing::error!("HTTP server task error: {}", e);
    }

    if let Err(e) = bot.delete_webhook().await {
        tracing::warn!("Failed to delete webhook: {}", e);
    } else {
        log_system_event("webhook deleted", None);
    }
    db_arc.close().await;

    info!("Application stopped");
    Ok(())
}
