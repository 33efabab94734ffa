use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use watch_core::{dispatch, InboundMessage, UpdateCursor};
use watch_engine::telegram::{Message, Update};
use watch_engine::{BotApi, TelegramError};
use watch_logging::{watch_debug, watch_info, watch_warn};

use crate::effects::EffectRunner;

#[derive(Debug, Clone)]
pub struct ResponderSettings {
    /// Pause between successful polls.
    pub idle_delay: Duration,
    /// Pause after a failed poll.
    pub error_delay: Duration,
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            idle_delay: Duration::from_secs(2),
            error_delay: Duration::from_secs(5),
        }
    }
}

/// Long-polls the bot API and answers inbound commands.
pub struct Responder {
    api: Arc<dyn BotApi>,
    runner: Arc<EffectRunner>,
    cursor: UpdateCursor,
    settings: ResponderSettings,
}

impl Responder {
    pub fn new(api: Arc<dyn BotApi>, runner: Arc<EffectRunner>, settings: ResponderSettings) -> Self {
        Self {
            api,
            runner,
            cursor: UpdateCursor::new(),
            settings,
        }
    }

    pub fn cursor(&self) -> UpdateCursor {
        self.cursor
    }

    /// Fetches one batch and handles it. Returns how many updates were consumed.
    pub async fn poll_once(&mut self) -> Result<usize, TelegramError> {
        let updates = self.api.get_updates(self.cursor.offset()).await?;
        let mut consumed = 0;
        for update in updates {
            if !self.cursor.is_pending(update.update_id) {
                watch_debug!("Skipping already consumed update {}", update.update_id);
                continue;
            }
            self.handle(update).await;
            consumed += 1;
        }
        Ok(consumed)
    }

    async fn handle(&mut self, update: Update) {
        let update_id = update.update_id;
        if let Some(message) = update.message {
            let inbound = inbound_message(message);
            watch_info!(
                "Update {} from chat {}: {:?}",
                update_id,
                inbound.chat_id,
                inbound.text
            );
            self.runner.run(vec![dispatch(&inbound)]).await;
        }
        self.cursor.advance(update_id);
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            let delay = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.poll_once() => match result {
                    Ok(_) => self.settings.idle_delay,
                    Err(err) => {
                        watch_warn!("Polling updates failed: {}", err);
                        self.settings.error_delay
                    }
                },
            };
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        watch_info!("Responder stopped");
    }
}

fn inbound_message(message: Message) -> InboundMessage {
    InboundMessage {
        chat_id: message.chat.id,
        user_id: message.from.map(|user| user.id),
        text: message.text,
    }
}
