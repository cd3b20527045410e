//! Telegram front end.
//!
//! The polling loop only receives updates; every message is handled in its
//! own task. Inside a handler the harvest runs as a separate task and the
//! spreadsheet is built on the blocking pool, so a long harvest never holds
//! up replies to other chats. On Ctrl-C the loop stops polling and gives the
//! in-flight tasks [`SHUTDOWN_GRACE`] to finish before aborting them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use telegram_client::{InputFile, Message, TelegramClient};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, warn};

use crate::error::{ErrorKind, HarvestError, Result};
use crate::export::{self, SpreadsheetExport};
use crate::harvester::harvest;
use crate::link::{detect_platform, Platform};
use crate::traits::CommentSource;

pub const HELP_TEXT: &str = "Hi! Send me a link. I will detect the platform and, if it is YouTube, \
collect the comments and send you an Excel file.\n\n\
Example: https://www.youtube.com/watch?v=B9oIps6Cb50";
pub const NOT_A_LINK_TEXT: &str = "Please send a valid link (it should start with http/https).";
pub const UNSUPPORTED_PLATFORM_TEXT: &str =
    "Only YouTube is supported for now. Send a link to a YouTube video.";
pub const NO_API_KEY_TEXT: &str =
    "YT_API_KEY is not configured on the server. Add it to .env and restart the bot.";
pub const NON_TEXT_TEXT: &str = "Send the link as a text message.";
pub const WORKING_TEXT: &str = "Collecting comments… This may take a while.";

/// Wait after a failed getUpdates call before polling again.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// How long shutdown waits for in-flight replies before aborting them.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// ChatSink — where replies go
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> telegram_client::Result<()>;

    async fn send_document(
        &self,
        chat_id: i64,
        file: InputFile,
        caption: &str,
    ) -> telegram_client::Result<()>;
}

#[async_trait]
impl ChatSink for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> telegram_client::Result<()> {
        self.send_message(chat_id, text).await.map(|_| ())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file: InputFile,
        caption: &str,
    ) -> telegram_client::Result<()> {
        TelegramClient::send_document(self, chat_id, file, Some(caption))
            .await
            .map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// AppContext
// ---------------------------------------------------------------------------

/// Everything a handler needs. Built once at startup, cloned into each task.
#[derive(Clone)]
pub struct AppContext {
    pub chat: Arc<dyn ChatSink>,
    /// `None` when no YouTube API key is configured.
    pub source: Option<Arc<dyn CommentSource>>,
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Help,
}

impl Command {
    /// `/start` and `/help`, with or without an `@botname` suffix.
    fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?.split('@').next()?;
        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

/// Long-poll Telegram until Ctrl-C, handling each message as its own task.
pub async fn run(ctx: AppContext, telegram: &TelegramClient, poll_timeout_secs: u64) -> anyhow::Result<()> {
    let mut offset: Option<i64> = None;
    let mut tasks = JoinSet::new();
    info!(poll_timeout_secs, "Polling for updates");

    loop {
        while tasks.try_join_next().is_some() {}

        let batch = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping polling");
                break;
            }
            batch = telegram.get_updates(offset, poll_timeout_secs) => batch,
        };

        let updates = match batch {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "getUpdates failed, backing off");
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            if let Some(message) = update.message {
                tasks.spawn(reply_task(ctx.clone(), message));
            }
        }
    }

    drain(&mut tasks, SHUTDOWN_GRACE).await;
    Ok(())
}

/// Handle `message` in a new task. Send failures are logged there.
pub fn dispatch(ctx: AppContext, message: Message) -> JoinHandle<()> {
    tokio::spawn(reply_task(ctx, message))
}

fn reply_task(ctx: AppContext, message: Message) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let chat_id = message.chat.id;
        if let Err(e) = handle_message(&ctx, &message).await {
            error!(chat_id, error = %e, "Failed to reply");
        }
    }
}

/// Wait up to `grace` for `tasks` to finish, then abort the rest.
/// Returns how many were abandoned.
pub async fn drain(tasks: &mut JoinSet<()>, grace: Duration) -> usize {
    if tasks.is_empty() {
        return 0;
    }
    info!(in_flight = tasks.len(), grace_secs = grace.as_secs(), "Waiting for in-flight replies");

    let finished = tokio::time::timeout(grace, async {
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Reply task failed during shutdown");
            }
        }
    })
    .await;
    if finished.is_ok() {
        return 0;
    }

    let abandoned = tasks.len();
    warn!(abandoned, "Shutdown grace elapsed, aborting in-flight replies");
    tasks.abort_all();
    abandoned
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn handle_message(ctx: &AppContext, message: &Message) -> telegram_client::Result<()> {
    let chat_id = message.chat.id;

    let Some(text) = message.text.as_deref() else {
        return ctx.chat.send_text(chat_id, NON_TEXT_TEXT).await;
    };
    let text = text.trim();

    if let Some(command) = Command::parse(text) {
        info!(chat_id, ?command, "Command received");
        return ctx.chat.send_text(chat_id, HELP_TEXT).await;
    }

    handle_link(ctx, chat_id, text).await
}

async fn handle_link(ctx: &AppContext, chat_id: i64, url: &str) -> telegram_client::Result<()> {
    if !url.starts_with("http") {
        return ctx.chat.send_text(chat_id, NOT_A_LINK_TEXT).await;
    }

    let platform = detect_platform(url);
    if platform != Platform::Youtube {
        info!(chat_id, %platform, "Unsupported platform");
        return ctx.chat.send_text(chat_id, UNSUPPORTED_PLATFORM_TEXT).await;
    }

    let Some(source) = ctx.source.clone() else {
        warn!(chat_id, "Harvest requested but YT_API_KEY is not configured");
        return ctx.chat.send_text(chat_id, NO_API_KEY_TEXT).await;
    };

    ctx.chat.send_text(chat_id, WORKING_TEXT).await?;

    info!(chat_id, url, "Harvest started");
    match harvest_to_spreadsheet(source, url.to_string(), ctx.page_size).await {
        Ok(export) => {
            info!(chat_id, rows = export.row_count, "Sending spreadsheet");
            let caption = export.caption();
            ctx.chat
                .send_document(chat_id, export.into_input_file(), &caption)
                .await
        }
        Err(e) => {
            match e.kind() {
                ErrorKind::Validation => warn!(chat_id, url, error = %e, "Rejected link"),
                ErrorKind::Upstream | ErrorKind::Unexpected => {
                    error!(chat_id, url, kind = ?e.kind(), error = %e, "Harvest failed")
                }
            }
            ctx.chat.send_text(chat_id, &e.user_message()).await
        }
    }
}

/// Harvest on its own task, then build the workbook on the blocking pool.
async fn harvest_to_spreadsheet(
    source: Arc<dyn CommentSource>,
    url: String,
    page_size: u32,
) -> Result<SpreadsheetExport> {
    let rows = tokio::spawn(async move { harvest(source.as_ref(), &url, page_size).await })
        .await
        .map_err(HarvestError::from)??;

    tokio::task::spawn_blocking(move || export::export(&rows))
        .await
        .map_err(HarvestError::from)?
}
