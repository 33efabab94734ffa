//! Bot API client: long-poll `getUpdates` and `sendMessage`.
//!
//! Both calls are plain GET requests with query parameters. The bot token is
//! part of the request path, so errors are stripped of their URL before they
//! reach a log line.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<Update>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TelegramError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("bot api returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed bot api response: {0}")]
    Decode(String),
    #[error("bot api rejected the call: {0}")]
    Api(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Transport(err.without_url().to_string())
    }
}

#[async_trait::async_trait]
pub trait BotApi: Send + Sync {
    /// Long-polls for updates at or after `offset`.
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError>;

    /// `chat_id` is a numeric id or an `@channel` username.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError>;
}

#[derive(Debug, Clone)]
pub struct BotApiSettings {
    pub api_url: String,
    pub token: String,
    /// Server-side hold time of a `getUpdates` call.
    pub poll_timeout: Duration,
    /// Extra client-side allowance on top of `poll_timeout`.
    pub poll_slack: Duration,
    pub send_timeout: Duration,
}

impl BotApiSettings {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            poll_timeout: Duration::from_secs(30),
            poll_slack: Duration::from_secs(10),
            send_timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestBotApi {
    settings: BotApiSettings,
    client: reqwest::Client,
}

impl ReqwestBotApi {
    pub fn new(settings: BotApiSettings) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { settings, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.settings.api_url.trim_end_matches('/'),
            self.settings.token,
            method
        )
    }
}

#[async_trait::async_trait]
impl BotApi for ReqwestBotApi {
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let mut query = vec![(
            "timeout",
            self.settings.poll_timeout.as_secs().to_string(),
        )];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&query)
            .timeout(self.settings.poll_timeout + self.settings.poll_slack)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TelegramError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: UpdateEnvelope =
            serde_json::from_str(&body).map_err(|err| TelegramError::Decode(err.to_string()))?;
        if !envelope.ok {
            return Err(TelegramError::Api(
                envelope.description.unwrap_or_else(|| "ok=false".to_string()),
            ));
        }
        Ok(envelope.result)
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError> {
        let response = self
            .client
            .get(self.method_url("sendMessage"))
            .query(&[("chat_id", chat_id), ("text", text)])
            .timeout(self.settings.send_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(TelegramError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
