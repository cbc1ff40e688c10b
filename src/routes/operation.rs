use std::fmt;
use std::str::FromStr;

use crate::errors::DiscordError;

/// HTTP verbs used by the webhook resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DiscordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(DiscordError::RouteError(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

/// Named client operations of the webhook resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateWebhook,
    GetChannelWebhooks,
    GetGuildWebhooks,
    GetWebhook,
    ModifyWebhook,
    DeleteWebhook,
    GetWebhookWithToken,
    ModifyWebhookWithToken,
    DeleteWebhookWithToken,
    ExecuteWebhook,
    ExecuteSlackCompatibleWebhook,
    ExecuteGitHubCompatibleWebhook,
    GetWebhookMessage,
    EditWebhookMessage,
    DeleteWebhookMessage,
}

impl Operation {
    pub const ALL: [Self; 15] = [
        Self::CreateWebhook,
        Self::GetChannelWebhooks,
        Self::GetGuildWebhooks,
        Self::GetWebhook,
        Self::ModifyWebhook,
        Self::DeleteWebhook,
        Self::GetWebhookWithToken,
        Self::ModifyWebhookWithToken,
        Self::DeleteWebhookWithToken,
        Self::ExecuteWebhook,
        Self::ExecuteSlackCompatibleWebhook,
        Self::ExecuteGitHubCompatibleWebhook,
        Self::GetWebhookMessage,
        Self::EditWebhookMessage,
        Self::DeleteWebhookMessage,
    ];

    /// Adapter-facing name, e.g. `getWebhookWithToken`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateWebhook => "createWebhook",
            Self::GetChannelWebhooks => "getChannelWebhooks",
            Self::GetGuildWebhooks => "getGuildWebhooks",
            Self::GetWebhook => "getWebhook",
            Self::ModifyWebhook => "modifyWebhook",
            Self::DeleteWebhook => "deleteWebhook",
            Self::GetWebhookWithToken => "getWebhookWithToken",
            Self::ModifyWebhookWithToken => "modifyWebhookWithToken",
            Self::DeleteWebhookWithToken => "deleteWebhookWithToken",
            Self::ExecuteWebhook => "executeWebhook",
            Self::ExecuteSlackCompatibleWebhook => "executeSlackCompatibleWebhook",
            Self::ExecuteGitHubCompatibleWebhook => "executeGitHubCompatibleWebhook",
            Self::GetWebhookMessage => "getWebhookMessage",
            Self::EditWebhookMessage => "editWebhookMessage",
            Self::DeleteWebhookMessage => "deleteWebhookMessage",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Operation {
    type Err = DiscordError;

    /// Names compare ASCII case-insensitively, so `getWebhookwithToken` resolves too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DiscordError::RouteError(format!("unknown operation: {s}")))
    }
}
