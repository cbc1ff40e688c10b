use std::env;
use std::time::Duration;

use crate::errors::DiscordError;

pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bot token for routes that are not authenticated by a webhook token.
    pub bot_token: Option<String>,
    pub api_base_url: String,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns an error if a variable is set but malformed.
    pub fn from_env() -> Result<Self, DiscordError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; `from_env` passes the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DiscordError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("DISCORD_BOT_TOKEN").filter(|t| !t.trim().is_empty());

        let api_base_url = lookup("DISCORD_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&api_base_url)
            .map_err(|e| DiscordError::ConfigError(format!("DISCORD_API_BASE_URL: {e}")))?;

        let http_timeout = match lookup("DISCORD_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    DiscordError::ConfigError(format!("DISCORD_HTTP_TIMEOUT_SECS: {e}"))
                })?;
                if secs == 0 {
                    return Err(DiscordError::ConfigError(
                        "DISCORD_HTTP_TIMEOUT_SECS must be > 0".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            bot_token,
            api_base_url,
            http_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.bot_token.is_none());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides_and_trims_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_BOT_TOKEN", "abc.def"),
            ("DISCORD_API_BASE_URL", "http://localhost:8080/api/v10/"),
            ("DISCORD_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.bot_token.as_deref(), Some("abc.def"));
        assert_eq!(config.api_base_url, "http://localhost:8080/api/v10");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_token_is_treated_as_absent() {
        let config = AppConfig::from_lookup(lookup_from(&[("DISCORD_BOT_TOKEN", "  ")])).unwrap();
        assert!(config.bot_token.is_none());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("DISCORD_HTTP_TIMEOUT_SECS", "soon")])),
            Err(DiscordError::ConfigError(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("DISCORD_HTTP_TIMEOUT_SECS", "0")])),
            Err(DiscordError::ConfigError(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("DISCORD_API_BASE_URL", "not a url")])),
            Err(DiscordError::ConfigError(_))
        ));
    }
}
