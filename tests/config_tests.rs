use movie_catalog_bot::config::{database_url_from_env, Config, DEFAULT_DATABASE_URL};
use std::env;
use std::sync::Mutex;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const ALL_VARS: [&str; 7] = [
    "BOT_TOKEN",
    "WEBHOOK_URL",
    "WEBHOOK_SECRET",
    "PORT",
    "ADMINS",
    "CHANNELS",
    "DATABASE_URL",
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("BOT_TOKEN", "test_token_123");
    env::set_var("WEBHOOK_URL", "https://example.com/webhook");
    env::set_var("WEBHOOK_SECRET", "s3cret");
    env::set_var("PORT", "8080");
    env::set_var("ADMINS", "111, 222");
    env::set_var("CHANNELS", "@movies,-1001234567890");
    env::set_var("DATABASE_URL", "sqlite:test.db");

    let config = Config::from_env().unwrap();

    assert_eq!(config.bot_token, "test_token_123");
    assert_eq!(config.webhook_url, "https://example.com/webhook");
    assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
    assert_eq!(config.port, 8080);
    assert_eq!(config.admins, vec![111, 222]);
    assert_eq!(config.channels, vec!["@movies", "-1001234567890"]);
    assert_eq!(config.database_url, "sqlite:test.db");

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("BOT_TOKEN", "required_token");
    env::set_var("WEBHOOK_URL", "https://example.com/webhook");

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, "sqlite:./data/catalog.db");
    assert_eq!(config.port, 10000);
    assert!(config.admins.is_empty());
    assert!(config.channels.is_empty());
    assert!(config.webhook_secret.is_none());

    clear_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("WEBHOOK_URL", "https://example.com/webhook");

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("BOT_TOKEN must be set"));

    env::set_var("BOT_TOKEN", "   ");
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_config_missing_webhook_url() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("BOT_TOKEN", "test_token");

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("WEBHOOK_URL must be set"));

    clear_env();
}

#[test]
fn test_config_invalid_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("BOT_TOKEN", "test_token");
    env::set_var("WEBHOOK_URL", "https://example.com/webhook");
    env::set_var("PORT", "invalid_port");

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("Invalid PORT"));

    clear_env();
}

#[test]
fn test_config_invalid_admin_id() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("BOT_TOKEN", "test_token");
    env::set_var("WEBHOOK_URL", "https://example.com/webhook");
    env::set_var("ADMINS", "123,@someone");

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("Invalid admin id"));

    clear_env();
}

#[test]
fn test_config_empty_database_url_uses_default() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    env::set_var("BOT_TOKEN", "test_token");
    env::set_var("WEBHOOK_URL", "https://example.com/webhook");
    env::set_var("DATABASE_URL", "  ");

    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url, "sqlite:./data/catalog.db");

    clear_env();
}

#[test]
fn test_database_url_from_env_without_bot_settings() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    // The migrate tool resolves the database without BOT_TOKEN or WEBHOOK_URL.
    assert_eq!(database_url_from_env(), DEFAULT_DATABASE_URL);

    env::set_var("DATABASE_URL", "sqlite:other.db");
    assert_eq!(database_url_from_env(), "sqlite:other.db");

    env::set_var("DATABASE_URL", "");
    assert_eq!(database_url_from_env(), DEFAULT_DATABASE_URL);

    clear_env();
}
