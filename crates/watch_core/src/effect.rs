use crate::ChatId;

/// Logical destination of a notification. The app maps these onto chat ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Operational alerts: outages, recoveries, startup snapshot.
    Admin,
    /// Subscribers interested in new reporting periods.
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify { channel: Channel, text: String },
    Reply { chat_id: ChatId, text: String },
    /// Fetch the page now and answer `chat_id` with whatever it shows.
    ProbeForChat { chat_id: ChatId },
}

impl Effect {
    pub(crate) fn admin(text: String) -> Self {
        Effect::Notify {
            channel: Channel::Admin,
            text,
        }
    }

    pub(crate) fn public(text: String) -> Self {
        Effect::Notify {
            channel: Channel::Public,
            text,
        }
    }
}
