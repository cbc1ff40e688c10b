use url::Url;

use crate::core::Snowflake;
use crate::errors::DiscordError;
use crate::routes::template::redact_token;

const DISCORD_HOSTS: &[&str] = &[
    "discord.com",
    "discordapp.com",
    "canary.discord.com",
    "ptb.discord.com",
];

/// Split a webhook execution URL into its id and token.
///
/// Accepts `https://discord.com/api/webhooks/<id>/<token>` with an optional
/// `/v<N>` API version segment and any of Discord's client hosts.
///
/// # Errors
///
/// Returns an error if the URL is not a Discord webhook URL.
pub fn parse_webhook_url(raw: &str) -> Result<(Snowflake, String), DiscordError> {
    let url = Url::parse(raw.trim())?;

    if url.scheme() != "https" {
        return Err(DiscordError::ParseError(format!(
            "webhook URL must use https, got {}",
            url.scheme()
        )));
    }

    let host = url.host_str().map(str::to_ascii_lowercase).unwrap_or_default();
    if !DISCORD_HOSTS.contains(&host.as_str()) {
        return Err(DiscordError::ParseError(format!(
            "not a Discord host: {host}"
        )));
    }

    let mut segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if segments.first() != Some(&"api") {
        return Err(DiscordError::ParseError(
            "webhook URL path must start with /api".to_string(),
        ));
    }
    segments.remove(0);
    if segments.first().is_some_and(|seg| is_version_segment(seg)) {
        segments.remove(0);
    }

    match segments.as_slice() {
        ["webhooks", id, token] => {
            let id: Snowflake = id.parse()?;
            let token = urlencoding::decode(token)
                .map_err(|e| DiscordError::ParseError(format!("webhook token: {e}")))?
                .into_owned();
            Ok((id, token))
        }
        _ => Err(DiscordError::ParseError(format!(
            "not a webhook execution URL: {}",
            redact_token(url.path())
        ))),
    }
}

fn is_version_segment(seg: &str) -> bool {
    seg.strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}
