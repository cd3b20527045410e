pub mod error;
pub mod types;

pub use error::{Result, TelegramError};
pub use types::{Chat, InputFile, Message, Update, User};

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use types::{ApiResponse, GetUpdatesParams, SendMessageParams};

const BASE_URL: &str = "https://api.telegram.org";

/// Timeout for ordinary method calls and uploads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Slack added on top of the long-poll timeout so the server answers first.
const POLL_SLACK: Duration = Duration::from_secs(10);

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(token: String) -> Self {
        Self::with_base_url(BASE_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Identity of the bot. Fails when the token is rejected.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({}), REQUEST_TIMEOUT)
            .await
    }

    /// Long-poll for new message updates starting at `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout_secs,
            allowed_updates: &["message"],
        };
        let timeout = Duration::from_secs(timeout_secs) + POLL_SLACK;
        self.call("getUpdates", &params, timeout).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        let params = SendMessageParams { chat_id, text };
        self.call("sendMessage", &params, REQUEST_TIMEOUT).await
    }

    /// Upload `file` as a document to `chat_id` via multipart form.
    pub async fn send_document(
        &self,
        chat_id: i64,
        file: InputFile,
        caption: Option<&str>,
    ) -> Result<Message> {
        let size = file.bytes.len();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        tracing::debug!(chat_id, file_name = %file.file_name, size, "Uploading document");

        let resp = self
            .client
            .post(self.endpoint("sendDocument"))
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await?;

        Self::unwrap_response(resp).await
    }

    async fn call<P: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
        timeout: Duration,
    ) -> Result<T> {
        let resp = self
            .client
            .post(self.endpoint(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await?;

        Self::unwrap_response(resp).await
    }

    async fn unwrap_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        let body = resp.text().await?;

        let api_resp: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                TelegramError::Parse(e.to_string())
            } else {
                TelegramError::Api {
                    code: i64::from(status.as_u16()),
                    description: body.clone(),
                }
            }
        })?;

        match (api_resp.ok, api_resp.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(TelegramError::Parse("ok response without result".to_string())),
            (false, _) => Err(TelegramError::Api {
                code: api_resp.error_code.unwrap_or(i64::from(status.as_u16())),
                description: api_resp.description.unwrap_or_default(),
            }),
        }
    }
}
