use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use comment_relay::{bot, AppContext, CommentSource, Config};
use telegram_client::TelegramClient;
use youtube_client::YoutubeClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    info!("comment-relay starting...");

    let config = Config::from_env()?;

    let telegram = Arc::new(TelegramClient::new(config.bot_token.clone()));
    let me = telegram
        .get_me()
        .await
        .context("Telegram rejected BOT_TOKEN")?;
    info!(bot_id = me.id, username = ?me.username, "Connected to Telegram");

    let source: Option<Arc<dyn CommentSource>> = match &config.youtube_api_key {
        Some(key) => Some(Arc::new(YoutubeClient::new(key.clone())?) as Arc<dyn CommentSource>),
        None => None,
    };

    let ctx = AppContext {
        chat: telegram.clone(),
        source,
        page_size: config.page_size,
    };

    bot::run(ctx, &telegram, config.poll_timeout_secs).await
}

/// `RUST_LOG` wins; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("comment_relay=info".parse()?);

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}
