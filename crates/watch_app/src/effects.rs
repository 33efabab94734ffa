use watch_core::{text, Channel, Effect};
use watch_engine::{Notifier, PageProbe};
use watch_logging::{watch_debug, watch_info, watch_warn};

use crate::config::Destinations;

/// Executes core effects against the notifier and the page probe.
pub struct EffectRunner {
    notifier: Notifier,
    probe: PageProbe,
    destinations: Destinations,
}

impl EffectRunner {
    pub fn new(notifier: Notifier, probe: PageProbe, destinations: Destinations) -> Self {
        Self {
            notifier,
            probe,
            destinations,
        }
    }

    pub async fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_one(effect).await;
        }
    }

    async fn run_one(&self, effect: Effect) {
        match effect {
            Effect::Notify { channel, text } => match self.destination(channel) {
                Some(chat) => {
                    watch_info!("Notify {:?} chat={} text={}", channel, chat, text);
                    self.notifier.send(chat, &text).await;
                }
                None => {
                    watch_debug!("No {:?} destination configured; dropping: {}", channel, text);
                }
            },
            Effect::Reply { chat_id, text } => {
                self.notifier.send(&chat_id.to_string(), &text).await;
            }
            Effect::ProbeForChat { chat_id } => {
                let marker = match self.probe.current_label().await {
                    Ok(label) => Some(label),
                    Err(err) => {
                        watch_warn!("On-demand probe of {} failed: {}", self.probe.url(), err);
                        None
                    }
                };
                let reply = text::current_period(marker.as_deref());
                self.notifier.send(&chat_id.to_string(), &reply).await;
            }
        }
    }

    fn destination(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Admin => self.destinations.admin.as_deref(),
            Channel::Public => self.destinations.public.as_deref(),
        }
    }
}
