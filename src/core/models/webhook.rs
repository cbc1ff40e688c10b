use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PartialChannel, PartialGuild, User};
use crate::core::{ImageData, Snowflake};
use crate::errors::DiscordError;

/// Maximum length Discord accepts for a webhook name.
pub const WEBHOOK_NAME_MAX_CHARS: usize = 80;

/// Substrings Discord refuses in webhook names.
const RESERVED_NAME_FRAGMENTS: &[&str] = &["clyde", "discord"];

/// <https://discord.com/developers/docs/resources/webhook#webhook-object-webhook-types>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WebhookType {
    /// Posts messages to channels with a generated token.
    Incoming = 1,
    /// Internal webhook used by channel following to post new messages.
    ChannelFollower = 2,
    /// Used with interactions.
    Application = 3,
}

impl TryFrom<u8> for WebhookType {
    type Error = DiscordError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Incoming),
            2 => Ok(Self::ChannelFollower),
            3 => Ok(Self::Application),
            other => Err(DiscordError::ParseError(format!(
                "unknown webhook type: {other}"
            ))),
        }
    }
}

impl From<WebhookType> for u8 {
    fn from(kind: WebhookType) -> Self {
        kind as u8
    }
}

impl fmt::Display for WebhookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Incoming => "incoming",
            Self::ChannelFollower => "channel follower",
            Self::Application => "application",
        };
        f.write_str(label)
    }
}

/// <https://discord.com/developers/docs/resources/webhook#webhook-object-webhook-structure>
///
/// `token` is only sent for incoming webhooks and `url` only comes back from
/// the `webhook.incoming` OAuth2 flow; both are kept exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: WebhookType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,
    /// Creator; omitted when the webhook is fetched with its token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_guild: Option<PartialGuild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_channel: Option<PartialChannel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Webhook {
    #[must_use]
    pub fn is_incoming(&self) -> bool {
        self.kind == WebhookType::Incoming
    }

    /// `(id, token)` for executing the webhook. Only incoming webhooks can be executed by token.
    #[must_use]
    pub fn credentials(&self) -> Option<(Snowflake, &str)> {
        if !self.is_incoming() {
            return None;
        }
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| (self.id, t))
    }

    /// Execution URL under `api_base_url`, built from the id and token.
    #[must_use]
    pub fn execute_url(&self, api_base_url: &str) -> Option<String> {
        let (id, token) = self.credentials()?;
        Some(format!(
            "{}/webhooks/{id}/{}",
            api_base_url.trim_end_matches('/'),
            urlencoding::encode(token)
        ))
    }
}

/// <https://discord.com/developers/docs/resources/webhook#create-webhook-json-params>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWebhookParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<ImageData>,
}

impl CreateWebhookParams {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar: ImageData) -> Self {
        self.avatar = Some(avatar);
        self
    }

    /// # Errors
    ///
    /// Returns an error if the name would be refused by Discord.
    pub fn validate(&self) -> Result<(), DiscordError> {
        validate_webhook_name(&self.name)
    }
}

/// <https://discord.com/developers/docs/resources/webhook#modify-webhook-json-params>
///
/// Unset fields are left out of the request body and keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModifyWebhookParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<ImageData>,
    /// New channel to move the webhook to. Not accepted by the token-authenticated route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,
}

impl ModifyWebhookParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar: ImageData) -> Self {
        self.avatar = Some(avatar);
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel_id: Snowflake) -> Self {
        self.channel_id = Some(channel_id);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar.is_none() && self.channel_id.is_none()
    }

    /// # Errors
    ///
    /// Returns an error if a name is set and would be refused by Discord.
    pub fn validate(&self) -> Result<(), DiscordError> {
        match &self.name {
            Some(name) => validate_webhook_name(name),
            None => Ok(()),
        }
    }
}

/// # Errors
///
/// Returns an error if `name` is empty, longer than 80 characters, or contains a reserved word.
pub fn validate_webhook_name(name: &str) -> Result<(), DiscordError> {
    let len = name.chars().count();
    if len == 0 || len > WEBHOOK_NAME_MAX_CHARS {
        return Err(DiscordError::ValidationError(format!(
            "webhook name must be 1-{WEBHOOK_NAME_MAX_CHARS} characters, got {len}"
        )));
    }

    let lowered = name.to_lowercase();
    if let Some(word) = RESERVED_NAME_FRAGMENTS
        .iter()
        .find(|word| lowered.contains(*word))
    {
        return Err(DiscordError::ValidationError(format!(
            "webhook name cannot contain '{word}'"
        )));
    }

    Ok(())
}
