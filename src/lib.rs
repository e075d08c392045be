//! # Movie Catalog Bot
//!
//! A Telegram bot serving a movie catalog to channel subscribers, with an
//! admin panel for curating movies and categories and broadcasting messages.
//!
//! ## Features
//! - Browse movies by title or category, or fetch one by its code
//! - Subscription gate: every interaction requires membership of the configured channels
//! - Admin flows: add/delete movies and categories, statistics, top movies, broadcast
//! - Webhook transport with an asynchronous processing queue
//! - Persistent storage with SQLite

/// Dispatcher, access control, admin state and menus
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// HTTP surface and the update listener
pub mod services;
/// Validation, feedback and logging helpers
pub mod utils;
