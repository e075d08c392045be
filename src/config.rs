use anyhow::{anyhow, Result};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/catalog.db";
const DEFAULT_PORT: u16 = 10000;

/// `DATABASE_URL`, or the default SQLite file when unset or blank.
pub fn database_url_from_env() -> String {
    env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub webhook_url: String,
    pub webhook_secret: Option<String>,
    pub port: u16,
    pub admins: Vec<u64>,
    pub channels: Vec<String>,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN")
            .map_err(|_| anyhow!("BOT_TOKEN must be set"))?;

        if bot_token.trim().is_empty() {
            return Err(anyhow!("BOT_TOKEN must be set"));
        }

        let webhook_url = env::var("WEBHOOK_URL")
            .map_err(|_| anyhow!("WEBHOOK_URL must be set"))?;
        if webhook_url.trim().is_empty() {
            return Err(anyhow!("WEBHOOK_URL must be set"));
        }

        let webhook_secret = env::var("WEBHOOK_SECRET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let database_url = database_url_from_env();

        let port = match env::var("PORT") {
            Ok(port_str) => port_str
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid PORT"))?,
            Err(_) => DEFAULT_PORT,
        };

        let admins = parse_admins(&env::var("ADMINS").unwrap_or_default())?;
        let channels = parse_list(&env::var("CHANNELS").unwrap_or_default());

        Ok(Config {
            bot_token,
            webhook_url: webhook_url.trim().to_string(),
            webhook_secret,
            port,
            admins,
            channels,
            database_url,
        })
    }
}

/// Splits a comma-separated list, trimming entries and skipping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_admins(raw: &str) -> Result<Vec<u64>> {
    parse_list(raw)
        .into_iter()
        .map(|id| {
            id.parse::<u64>()
                .map_err(|_| anyhow!("Invalid admin id in ADMINS: {}", id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_skips_blanks() {
        assert_eq!(parse_list(" @one, ,@two,"), vec!["@one", "@two"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_admins() {
        assert_eq!(parse_admins("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_admins("").unwrap().is_empty());
        assert!(parse_admins("12,abc").is_err());
    }
}
