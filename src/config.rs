//! Environment-driven configuration

use crate::error::ConfigError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_FEED_BASE_URL: &str = "wss://fstream.binance.com/ws";

/// Upstream kline stream settings
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub base_url: String,
    pub symbol: String,
    pub interval: String,
    /// Accept intra-interval candle updates instead of only closed candles
    pub accept_interim: bool,
}

impl FeedConfig {
    /// Stream URL for the configured instrument, e.g. `.../ws/btcusdt@kline_1m`
    pub fn stream_url(&self) -> String {
        format!(
            "{}/{}@kline_{}",
            self.base_url.trim_end_matches('/'),
            self.symbol.to_lowercase(),
            self.interval
        )
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_BASE_URL.to_string(),
            symbol: "BTCUSDT".to_string(),
            interval: "1m".to_string(),
            accept_interim: false,
        }
    }
}

/// Reconnect backoff for the feed connection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: usize,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub environment: String,
    pub log_level: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub feed: FeedConfig,
    pub reconnect: ReconnectConfig,
    pub evaluation_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            log_level: "info".to_string(),
            port: 8080,
            database_url: None,
            feed: FeedConfig::default(),
            reconnect: ReconnectConfig::default(),
            evaluation_interval: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let feed = FeedConfig {
            base_url: text("FEED_BASE_URL", &defaults.feed.base_url),
            symbol: text("SYMBOL", &defaults.feed.symbol),
            interval: text("KLINE_INTERVAL", &defaults.feed.interval),
            accept_interim: parse_bool(&lookup, "ACCEPT_INTERIM_CANDLES", defaults.feed.accept_interim)?,
        };

        let reconnect = ReconnectConfig {
            min_delay: Duration::from_millis(parse(
                &lookup,
                "RECONNECT_MIN_DELAY_MS",
                defaults.reconnect.min_delay.as_millis() as u64,
            )?),
            max_delay: Duration::from_millis(parse(
                &lookup,
                "RECONNECT_MAX_DELAY_MS",
                defaults.reconnect.max_delay.as_millis() as u64,
            )?),
            max_attempts: parse(&lookup, "RECONNECT_MAX_ATTEMPTS", defaults.reconnect.max_attempts)?,
        };

        let eval_seconds: u64 = parse(
            &lookup,
            "EVAL_INTERVAL_SECONDS",
            defaults.evaluation_interval.as_secs(),
        )?;
        if eval_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "EVAL_INTERVAL_SECONDS",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            environment: text("APP_ENV", &defaults.environment),
            log_level: text("LOG_LEVEL", &defaults.log_level),
            port: parse(&lookup, "PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            feed,
            reconnect,
            evaluation_interval: Duration::from_secs(eval_seconds),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            value: other.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
