use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Failed to parse Discord payload: {0}")]
    ParseError(String),

    #[error("Discord API returned HTTP {status} (code {code}): {message}")]
    ApiError {
        status: u16,
        code: u64,
        message: String,
    },

    #[error("Rate limited by Discord, {}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<f64> },

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid request parameters: {0}")]
    ValidationError(String),

    #[error("Failed to resolve route: {0}")]
    RouteError(String),

    #[error("{0}")]
    GeneralError(String),
}

fn retry_hint(retry_after: &Option<f64>) -> String {
    match retry_after {
        Some(secs) => format!("retry after {secs}s"),
        None => "no retry delay given".to_string(),
    }
}

impl From<reqwest::Error> for DiscordError {
    fn from(error: reqwest::Error) -> Self {
        // Webhook URLs embed the token.
        DiscordError::HttpError(error.without_url().to_string())
    }
}

impl From<serde_json::Error> for DiscordError {
    fn from(error: serde_json::Error) -> Self {
        DiscordError::ParseError(error.to_string())
    }
}

impl From<url::ParseError> for DiscordError {
    fn from(error: url::ParseError) -> Self {
        DiscordError::ParseError(format!("invalid URL: {error}"))
    }
}

impl From<anyhow::Error> for DiscordError {
    fn from(error: anyhow::Error) -> Self {
        DiscordError::GeneralError(error.to_string())
    }
}
