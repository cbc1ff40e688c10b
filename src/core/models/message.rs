use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::User;
use crate::core::Snowflake;
use crate::errors::DiscordError;

pub const MESSAGE_CONTENT_MAX_CHARS: usize = 2000;
pub const MESSAGE_EMBEDS_MAX: usize = 10;

/// A message posted by a webhook.
///
/// Only the fields webhook callers usually need are typed; everything else
/// the API returns lands in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// <https://discord.com/developers/docs/resources/webhook#execute-webhook-jsonform-params>
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecuteWebhookParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Overrides the webhook's default name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Overrides the webhook's default avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    /// Creates a thread when posting into a forum channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,
}

impl ExecuteWebhookParams {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    #[must_use]
    pub fn with_embed(mut self, embed: Value) -> Self {
        self.embeds.push(embed);
        self
    }

    #[must_use]
    pub fn with_allowed_mentions(mut self, allowed_mentions: Value) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = Some(thread_name.into());
        self
    }

    /// # Errors
    ///
    /// Returns an error if the message is empty or exceeds Discord's limits.
    pub fn validate(&self) -> Result<(), DiscordError> {
        let has_content = self.content.as_deref().is_some_and(|c| !c.trim().is_empty());
        if !has_content && self.embeds.is_empty() {
            return Err(DiscordError::ValidationError(
                "webhook message needs content or at least one embed".to_string(),
            ));
        }
        validate_content_and_embeds(self.content.as_deref(), &self.embeds)
    }
}

/// <https://discord.com/developers/docs/resources/webhook#edit-webhook-message-jsonform-params>
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditWebhookMessageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<Value>,
}

impl EditWebhookMessageParams {
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embeds(mut self, embeds: Vec<Value>) -> Self {
        self.embeds = Some(embeds);
        self
    }

    /// # Errors
    ///
    /// Returns an error if the edit exceeds Discord's limits.
    pub fn validate(&self) -> Result<(), DiscordError> {
        validate_content_and_embeds(
            self.content.as_deref(),
            self.embeds.as_deref().unwrap_or_default(),
        )
    }
}

fn validate_content_and_embeds(content: Option<&str>, embeds: &[Value]) -> Result<(), DiscordError> {
    if let Some(content) = content {
        let len = content.chars().count();
        if len > MESSAGE_CONTENT_MAX_CHARS {
            return Err(DiscordError::ValidationError(format!(
                "content is {len} characters, limit is {MESSAGE_CONTENT_MAX_CHARS}"
            )));
        }
    }
    if embeds.len() > MESSAGE_EMBEDS_MAX {
        return Err(DiscordError::ValidationError(format!(
            "{} embeds given, limit is {MESSAGE_EMBEDS_MAX}",
            embeds.len()
        )));
    }
    Ok(())
}
