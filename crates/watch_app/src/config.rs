//! Process configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first; real environment
//! variables take precedence over it.

use std::time::Duration;

use log::LevelFilter;
use watch_core::NotifyPolicy;
use watch_engine::{telegram::DEFAULT_API_URL, DEFAULT_PERIOD_SELECTOR};

use crate::logging::LogDestination;

pub const DEFAULT_PAGE_URL: &str = "https://www.atsenergo.ru/results/market/calcfacthour";
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_PUBLIC_CHAT: &str = "TELEGRAM_CHAT_ID";
pub const ENV_ADMIN_CHAT: &str = "ADMIN_CHAT_ID";
pub const ENV_API_URL: &str = "TELEGRAM_API_URL";
pub const ENV_PAGE_URL: &str = "WATCH_PAGE_URL";
pub const ENV_PERIOD_SELECTOR: &str = "WATCH_PERIOD_SELECTOR";
pub const ENV_INSECURE_TLS: &str = "WATCH_INSECURE_TLS";
pub const ENV_POLICY: &str = "WATCH_POLICY";
pub const ENV_CHECK_INTERVAL: &str = "WATCH_CHECK_INTERVAL_SECS";
pub const ENV_LOG: &str = "WATCH_LOG";
pub const ENV_LOG_LEVEL: &str = "WATCH_LOG_LEVEL";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{name} has invalid value `{value}`: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Where admin and public notifications go. Unset destinations are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Destinations {
    pub public: Option<String>,
    pub admin: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub bot_token: String,
    pub api_url: String,
    pub destinations: Destinations,
    pub page_url: String,
    pub period_selector: String,
    pub insecure_tls: bool,
    pub policy: NotifyPolicy,
    pub check_interval: Duration,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

// Keeps the token out of debug output.
impl std::fmt::Debug for WatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchConfig")
            .field("bot_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("destinations", &self.destinations)
            .field("page_url", &self.page_url)
            .field("period_selector", &self.period_selector)
            .field("insecure_tls", &self.insecure_tls)
            .field("policy", &self.policy)
            .field("check_interval", &self.check_interval)
            .field("log_destination", &self.log_destination)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl WatchConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get(ENV_BOT_TOKEN).ok_or(ConfigError::Missing(ENV_BOT_TOKEN))?;

        let destinations = Destinations {
            public: get(ENV_PUBLIC_CHAT)
                .map(|v| parse_chat(ENV_PUBLIC_CHAT, v))
                .transpose()?,
            admin: get(ENV_ADMIN_CHAT)
                .map(|v| parse_chat(ENV_ADMIN_CHAT, v))
                .transpose()?,
        };

        let insecure_tls = match get(ENV_INSECURE_TLS) {
            Some(value) => parse_bool(ENV_INSECURE_TLS, value)?,
            None => false,
        };

        let policy = match get(ENV_POLICY) {
            Some(value) => value.parse::<NotifyPolicy>().map_err(|reason| ConfigError::Invalid {
                name: ENV_POLICY,
                value,
                reason,
            })?,
            None => NotifyPolicy::default(),
        };

        let check_interval = match get(ENV_CHECK_INTERVAL) {
            Some(value) => parse_interval(ENV_CHECK_INTERVAL, value)?,
            None => DEFAULT_CHECK_INTERVAL,
        };

        let log_destination = match get(ENV_LOG) {
            Some(value) => value.parse::<LogDestination>().map_err(|reason| ConfigError::Invalid {
                name: ENV_LOG,
                value,
                reason,
            })?,
            None => LogDestination::Terminal,
        };

        let log_level = match get(ENV_LOG_LEVEL) {
            Some(value) => match watch_logging::parse_level(&value) {
                Some(level) => level,
                None => {
                    return Err(ConfigError::Invalid {
                        name: ENV_LOG_LEVEL,
                        value,
                        reason: "expected off, error, warn, info, debug or trace".to_string(),
                    })
                }
            },
            None => LevelFilter::Info,
        };

        Ok(Self {
            bot_token,
            api_url: get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            destinations,
            page_url: get(ENV_PAGE_URL).unwrap_or_else(|| DEFAULT_PAGE_URL.to_string()),
            period_selector: get(ENV_PERIOD_SELECTOR)
                .unwrap_or_else(|| DEFAULT_PERIOD_SELECTOR.to_string()),
            insecure_tls,
            policy,
            check_interval,
            log_destination,
            log_level,
        })
    }
}

fn parse_chat(name: &'static str, value: String) -> Result<String, ConfigError> {
    let numeric = value.parse::<i64>().is_ok();
    let username = value.len() > 1 && value.starts_with('@');
    if numeric || username {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            value,
            reason: "expected a numeric chat id or an @channel name".to_string(),
        })
    }
}

fn parse_bool(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_interval(name: &'static str, value: String) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name,
            value,
            reason: "expected a positive number of seconds".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<WatchConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WatchConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn token_is_required() {
        assert_eq!(
            config_from(&[(ENV_PUBLIC_CHAT, "1")]).unwrap_err(),
            ConfigError::Missing(ENV_BOT_TOKEN)
        );
        assert_eq!(
            config_from(&[(ENV_BOT_TOKEN, "   ")]).unwrap_err(),
            ConfigError::Missing(ENV_BOT_TOKEN)
        );
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = config_from(&[(ENV_BOT_TOKEN, "123:abc")]).unwrap();

        assert_eq!(config.destinations, Destinations::default());
        assert_eq!(config.page_url, DEFAULT_PAGE_URL);
        assert_eq!(config.period_selector, DEFAULT_PERIOD_SELECTOR);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(!config.insecure_tls);
        assert_eq!(config.policy, NotifyPolicy::Edge);
        assert_eq!(config.check_interval, Duration::from_secs(300));
        assert_eq!(config.log_destination, LogDestination::Terminal);
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn optional_values_are_parsed() {
        let config = config_from(&[
            (ENV_BOT_TOKEN, "123:abc"),
            (ENV_PUBLIC_CHAT, "@period_news"),
            (ENV_ADMIN_CHAT, "-100123"),
            (ENV_INSECURE_TLS, "TRUE"),
            (ENV_POLICY, "seen-set"),
            (ENV_CHECK_INTERVAL, "60"),
            (ENV_LOG, "both"),
            (ENV_LOG_LEVEL, "debug"),
        ])
        .unwrap();

        assert_eq!(config.destinations.public.as_deref(), Some("@period_news"));
        assert_eq!(config.destinations.admin.as_deref(), Some("-100123"));
        assert!(config.insecure_tls);
        assert_eq!(config.policy, NotifyPolicy::SeenSet);
        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad = [
            (ENV_ADMIN_CHAT, "admin"),
            (ENV_INSECURE_TLS, "maybe"),
            (ENV_POLICY, "sometimes"),
            (ENV_CHECK_INTERVAL, "0"),
            (ENV_LOG, "syslog"),
            (ENV_LOG_LEVEL, "loud"),
        ];
        for (name, value) in bad {
            let err = config_from(&[(ENV_BOT_TOKEN, "123:abc"), (name, value)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: n, .. } if n == name),
                "{name}={value} gave {err:?}"
            );
        }
    }

    #[test]
    fn debug_output_hides_token() {
        let config = config_from(&[(ENV_BOT_TOKEN, "123:secret")]).unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
