//! Watch core: pure change-detection state machine and command dispatch.
mod command;
mod cursor;
mod effect;
mod msg;
mod period;
mod state;
pub mod text;
mod update;

pub use command::{dispatch, ChatId, Command, InboundMessage, UserId};
pub use cursor::UpdateCursor;
pub use effect::{Channel, Effect};
pub use msg::Msg;
pub use period::{FailureKind, PeriodOption, ProbeFailure};
pub use state::{NotifyPolicy, WatchState, WatchView};
pub use update::update;
