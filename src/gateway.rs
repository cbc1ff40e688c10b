//! Gateway dispatch payloads related to webhooks.
//!
//! Only decoding lives here; connecting to the gateway and running the
//! dispatch loop belongs to whatever owns the socket.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::Snowflake;
use crate::errors::DiscordError;

/// Gateway opcode for event dispatches.
pub const OPCODE_DISPATCH: u8 = 0;

pub const WEBHOOKS_UPDATE: &str = "WEBHOOKS_UPDATE";

/// Sent when a guild channel's webhook is created, updated, or deleted.
///
/// <https://discord.com/developers/docs/topics/gateway-events#webhooks-update>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhooksUpdateEvent {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
}

/// Raw gateway frame: `{ "op": 0, "t": "WEBHOOKS_UPDATE", "s": 42, "d": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,
    #[serde(default)]
    pub t: Option<String>,
    #[serde(default)]
    pub s: Option<u64>,
    #[serde(default)]
    pub d: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    WebhooksUpdate(WebhooksUpdateEvent),
    /// Any dispatch this crate does not model.
    Unknown { name: String, data: Value },
}

impl GatewayEvent {
    /// Decode the `d` field of a dispatch named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if a known event's data does not match its shape.
    pub fn from_dispatch(name: &str, data: Value) -> Result<Self, DiscordError> {
        match name {
            WEBHOOKS_UPDATE => {
                let event: WebhooksUpdateEvent = serde_json::from_value(data).map_err(|e| {
                    DiscordError::ParseError(format!("{WEBHOOKS_UPDATE} payload: {e}"))
                })?;
                Ok(Self::WebhooksUpdate(event))
            }
            other => {
                debug!(event = other, "Ignoring unmodelled gateway dispatch");
                Ok(Self::Unknown {
                    name: other.to_string(),
                    data,
                })
            }
        }
    }

    /// Decode a full gateway frame. Only dispatch frames (opcode 0) carry events.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is malformed, is not a dispatch, or has no event name.
    pub fn from_frame(frame: &str) -> Result<Self, DiscordError> {
        let payload: GatewayPayload = serde_json::from_str(frame)?;
        if payload.op != OPCODE_DISPATCH {
            return Err(DiscordError::ParseError(format!(
                "expected dispatch opcode {OPCODE_DISPATCH}, got {}",
                payload.op
            )));
        }
        let name = payload
            .t
            .ok_or_else(|| DiscordError::ParseError("dispatch frame without event name".to_string()))?;

        Self::from_dispatch(&name, payload.d)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::WebhooksUpdate(_) => WEBHOOKS_UPDATE,
            Self::Unknown { name, .. } => name,
        }
    }
}
