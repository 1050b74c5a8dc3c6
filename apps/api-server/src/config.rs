//! Application configuration loaded from environment variables.

use std::env;

use chrono::{TimeDelta, Utc};

use folio_core::services::DEFAULT_SESSION_TTL_HOURS;
use folio_infra::{PasswordConfig, StoreConfig, UploadConfig};

#[cfg(feature = "rate-limit")]
use folio_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs against the in-memory store.
    pub store: Option<StoreConfig>,
    pub passwords: PasswordConfig,
    pub session_ttl: TimeDelta,
    pub uploads: UploadConfig,
    pub registration_enabled: bool,
    /// Mark the session cookie `Secure` (set behind TLS).
    pub cookie_secure: bool,
    #[cfg(feature = "rate-limit")]
    pub login_rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8880,
            store: None,
            passwords: PasswordConfig::default(),
            session_ttl: TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS),
            uploads: UploadConfig::default(),
            registration_enabled: true,
            cookie_secure: false,
            #[cfg(feature = "rate-limit")]
            login_rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            store: StoreConfig::from_env(),
            passwords: PasswordConfig::from_env(),
            session_ttl: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| parse_session_ttl(&s))
                .unwrap_or(defaults.session_ttl),
            uploads: UploadConfig::from_env(),
            registration_enabled: env_flag("REGISTRATION_ENABLED")
                .unwrap_or(defaults.registration_enabled),
            cookie_secure: env_flag("COOKIE_SECURE").unwrap_or(defaults.cookie_secure),
            #[cfg(feature = "rate-limit")]
            login_rate_limit: RateLimitConfig::from_env(),
        }
    }
}

/// Positive whole hours whose expiry still fits in the calendar.
fn parse_session_ttl(value: &str) -> Option<TimeDelta> {
    let hours: i64 = value.trim().parse().ok().filter(|h| *h > 0)?;
    let ttl = TimeDelta::try_hours(hours)?;
    match Utc::now().checked_add_signed(ttl) {
        Some(_) => Some(ttl),
        None => {
            tracing::warn!(hours, "SESSION_TTL_HOURS out of range, using the default");
            None
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off" | ""
    )
}
