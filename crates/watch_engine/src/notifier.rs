use std::sync::Arc;

use watch_logging::{watch_debug, watch_warn};

use crate::telegram::BotApi;

/// Fire-and-forget message delivery.
///
/// Failures are logged here and never retried or returned.
#[derive(Clone)]
pub struct Notifier {
    api: Arc<dyn BotApi>,
}

impl Notifier {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self { api }
    }

    pub async fn send(&self, chat_id: &str, text: &str) {
        match self.api.send_message(chat_id, text).await {
            Ok(()) => watch_debug!("Delivered {} chars to chat {}", text.chars().count(), chat_id),
            Err(err) => watch_warn!("Failed to deliver message to chat {}: {}", chat_id, err),
        }
    }
}
