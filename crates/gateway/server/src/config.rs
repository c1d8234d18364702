use std::time::Duration;

use notify_channels::{SendGridConfig, TwilioConfig};
use notify_push::{DEFAULT_RELAY_TIMEOUT, EXPO_API_URL};
use thiserror::Error;

const DEFAULT_PORT: u16 = 3004;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Gateway settings read from the environment.
///
/// Provider credentials stay optional here; a sender missing one fails when
/// it is first used.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub twilio: TwilioConfig,
    pub sendgrid: SendGridConfig,
    pub expo_access_token: Option<String>,
    pub expo_api_url: String,
    /// Per-request timeout for all provider calls.
    pub provider_timeout: Duration,
}

impl GatewayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variables. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => parse("PORT", value)?,
            None => DEFAULT_PORT,
        };

        let provider_timeout = match get("RELAY_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse("RELAY_TIMEOUT_SECS", value)?),
            None => DEFAULT_RELAY_TIMEOUT,
        };

        Ok(Self {
            port,
            twilio: TwilioConfig {
                account_sid: get("TWILIO_ACCOUNT_SID"),
                auth_token: get("TWILIO_AUTH_TOKEN"),
                from_number: get("TWILIO_PHONE_NUMBER"),
            },
            sendgrid: SendGridConfig {
                api_key: get("SENDGRID_API_KEY"),
                sender_email: get("SENDER_EMAIL"),
            },
            expo_access_token: get("EXPO_ACCESS_TOKEN"),
            expo_api_url: get("EXPO_API_URL").unwrap_or_else(|| EXPO_API_URL.to_string()),
            provider_timeout,
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
