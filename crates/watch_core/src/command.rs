use crate::{text, Effect};

pub type ChatId = i64;
pub type UserId = i64;

/// An inbound chat message, already stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/current`: report the period the page shows right now.
    Current,
    /// Anything else, including messages without text.
    Other,
}

impl Command {
    /// Parses the leading command word. `/current@somebot` addresses the same command.
    pub fn parse(text: Option<&str>) -> Self {
        let Some(word) = text.and_then(|t| t.split_whitespace().next()) else {
            return Command::Other;
        };
        let name = word.split_once('@').map_or(word, |(name, _bot)| name);
        if name.eq_ignore_ascii_case("/current") {
            Command::Current
        } else {
            Command::Other
        }
    }
}

/// Decides how to answer one inbound message.
pub fn dispatch(message: &InboundMessage) -> Effect {
    match Command::parse(message.text.as_deref()) {
        Command::Current => Effect::ProbeForChat {
            chat_id: message.chat_id,
        },
        Command::Other => Effect::Reply {
            chat_id: message.chat_id,
            text: text::identity(message.user_id, message.chat_id),
        },
    }
}
