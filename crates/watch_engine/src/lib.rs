//! Watch engine: page probing and Bot API transport.
mod decode;
mod extract;
mod fetch;
mod notifier;
mod probe;
pub mod telegram;
mod types;

pub use decode::{decode_html, DecodeError, DecodedHtml, EncodingSource};
pub use extract::{ExtractError, ExtractedPeriod, PeriodExtractor, DEFAULT_PERIOD_SELECTOR};
pub use fetch::{FetchSettings, PageFetcher, ReqwestPageFetcher};
pub use notifier::Notifier;
pub use probe::{PageProbe, ProbeError};
pub use telegram::{BotApi, BotApiSettings, ReqwestBotApi, TelegramError};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
