use anyhow::{bail, Result};
use youtube_client::MAX_PAGE_SIZE;

use crate::harvester::DEFAULT_PAGE_SIZE;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub poll_timeout_secs: u64,

    // YouTube Data API. Without a key the bot runs but cannot harvest.
    pub youtube_api_key: Option<String>,
    pub page_size: u32,
}

impl Config {
    /// Load from the process environment. Fails if `BOT_TOKEN` is missing.
    pub fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let Some(bot_token) = non_empty("BOT_TOKEN") else {
            bail!("BOT_TOKEN environment variable is required");
        };

        let youtube_api_key = non_empty("YT_API_KEY");
        if youtube_api_key.is_none() {
            tracing::warn!("YT_API_KEY is not set, comment harvesting is disabled");
        }

        let poll_timeout_secs = match non_empty("POLL_TIMEOUT_SECS") {
            Some(v) => v.parse()?,
            None => 30,
        };

        let page_size = match non_empty("COMMENTS_PAGE_SIZE") {
            Some(v) => v.parse::<u32>()?.clamp(1, MAX_PAGE_SIZE),
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            bot_token,
            poll_timeout_secs,
            youtube_api_key,
            page_size,
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let head: String = val.chars().take(5).collect();
            format!("{head}...({} chars)", val.len())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  BOT_TOKEN: {}", preview(&self.bot_token));
        tracing::info!("  YT_API_KEY: {}", preview_opt(&self.youtube_api_key));
        tracing::info!("  POLL_TIMEOUT_SECS: {}", self.poll_timeout_secs);
        tracing::info!("  COMMENTS_PAGE_SIZE: {}", self.page_size);
    }
}
