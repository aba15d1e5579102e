//! Lobby configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable              | Default          |
//! |-----------------------|------------------|
//! | `LISTEN_ADDR`         | `0.0.0.0:$PORT`  |
//! | `PORT`                | `10000`          |
//! | `RETRY_INTERVAL_SECS` | `10`             |
//! | `EVENT_BUS_CAPACITY`  | `10000`          |
//! | `LOG_FORMAT`          | `text`           |

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::LobbyError;

/// Longest accepted auto-retry period, one day.
pub const MAX_RETRY_INTERVAL_SECS: u64 = 86_400;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level lobby configuration.
///
/// Loaded once at startup via [`LobbyConfig::from_env`].
#[derive(Debug, Clone)]
pub struct LobbyConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Period of the auto-retry sweep.
    pub retry_interval: Duration,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 10_000)),
            retry_interval: Duration::from_secs(10),
            event_bus_capacity: 10_000,
            log_format: LogFormat::Text,
        }
    }
}

impl LobbyConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Config`] if `LISTEN_ADDR` is set but is not a
    /// valid socket address, or if `RETRY_INTERVAL_SECS` is zero or above
    /// [`MAX_RETRY_INTERVAL_SECS`].
    pub fn from_env() -> Result<Self, LobbyError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`LobbyConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LobbyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|e| LobbyError::Config(format!("LISTEN_ADDR {raw:?}: {e}")))?,
            None => {
                let port = parse_value(lookup("PORT"), defaults.listen_addr.port());
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let retry_secs: u64 = parse_value(
            lookup("RETRY_INTERVAL_SECS"),
            defaults.retry_interval.as_secs(),
        );
        if retry_secs == 0 {
            return Err(LobbyError::Config(
                "RETRY_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if retry_secs > MAX_RETRY_INTERVAL_SECS {
            return Err(LobbyError::Config(format!(
                "RETRY_INTERVAL_SECS must be at most {MAX_RETRY_INTERVAL_SECS}, got {retry_secs}"
            )));
        }

        let event_bus_capacity = parse_value(
            lookup("EVENT_BUS_CAPACITY"),
            defaults.event_bus_capacity,
        )
        .max(1);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            retry_interval: Duration::from_secs(retry_secs),
            event_bus_capacity,
            log_format,
        })
    }
}

/// Parses an optional raw value as `T`, returning `default` on missing
/// or invalid values.
fn parse_value<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<LobbyConfig, LobbyError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        LobbyConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = tokio_test::assert_ok!(load(&[]));
        assert_eq!(cfg.listen_addr.port(), 10_000);
        assert_eq!(cfg.retry_interval, Duration::from_secs(10));
        assert_eq!(cfg.event_bus_capacity, 10_000);
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn port_is_used_without_listen_addr() {
        let cfg = tokio_test::assert_ok!(load(&[("PORT", "8080")]));
        assert_eq!(cfg.listen_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn listen_addr_wins_over_port() {
        let Ok(cfg) = load(&[("LISTEN_ADDR", "127.0.0.1:4000"), ("PORT", "8080")]) else {
            panic!("config should load");
        };
        assert_eq!(cfg.listen_addr.port(), 4000);
    }

    #[test]
    fn invalid_values_fall_back_or_fail() {
        let Ok(cfg) = load(&[("RETRY_INTERVAL_SECS", "soon"), ("LOG_FORMAT", "json")]) else {
            panic!("config should load");
        };
        assert_eq!(cfg.retry_interval, Duration::from_secs(10));
        assert_eq!(cfg.log_format, LogFormat::Json);

        assert!(matches!(
            load(&[("LISTEN_ADDR", "nowhere")]),
            Err(LobbyError::Config(_))
        ));
        assert!(matches!(
            load(&[("RETRY_INTERVAL_SECS", "0")]),
            Err(LobbyError::Config(_))
        ));
    }

    #[test]
    fn retry_interval_has_an_upper_bound() {
        let max = MAX_RETRY_INTERVAL_SECS.to_string();
        let cfg = tokio_test::assert_ok!(load(&[("RETRY_INTERVAL_SECS", max.as_str())]));
        assert_eq!(cfg.retry_interval.as_secs(), MAX_RETRY_INTERVAL_SECS);

        let over = (MAX_RETRY_INTERVAL_SECS + 1).to_string();
        assert!(matches!(
            load(&[("RETRY_INTERVAL_SECS", over.as_str())]),
            Err(LobbyError::Config(_))
        ));
        let huge = u64::MAX.to_string();
        assert!(matches!(
            load(&[("RETRY_INTERVAL_SECS", huge.as_str())]),
            Err(LobbyError::Config(_))
        ));
    }
}
