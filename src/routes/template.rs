use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::errors::DiscordError;

// `{resource.field}`, e.g. `{webhook.token}`
static PLACEHOLDER_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^\{([a-z_]+\.[a-z_]+)\}$")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

// Leading `/api` or `/api/v10` on a full request path.
static API_PREFIX_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^/api(?:/v\d+)?(/|$)")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

/// Values for the placeholders of a route template, keyed by `resource.field`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn channel(self, id: impl Display) -> Self {
        self.with("channel.id", id)
    }

    #[must_use]
    pub fn guild(self, id: impl Display) -> Self {
        self.with("guild.id", id)
    }

    #[must_use]
    pub fn webhook(self, id: impl Display) -> Self {
        self.with("webhook.id", id)
    }

    #[must_use]
    pub fn token(self, token: impl Display) -> Self {
        self.with("webhook.token", token)
    }

    #[must_use]
    pub fn message(self, id: impl Display) -> Self {
        self.with("message.id", id)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    PLACEHOLDER_RE
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Placeholder keys of `template`, in order.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    template.split('/').filter_map(placeholder).collect()
}

/// Substitute every placeholder in `template`. Values are percent-encoded.
///
/// # Errors
///
/// Returns an error if a placeholder has no value or its value is empty.
pub fn render(template: &str, params: &RouteParams) -> Result<String, DiscordError> {
    let mut rendered = Vec::new();
    for segment in template.split('/') {
        match placeholder(segment) {
            Some(key) => {
                let value = params
                    .get(key)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| {
                        DiscordError::RouteError(format!("missing value for {{{key}}} in {template}"))
                    })?;
                rendered.push(urlencoding::encode(value).into_owned());
            }
            None => rendered.push(segment.to_string()),
        }
    }
    Ok(rendered.join("/"))
}

/// Match a concrete request path against `template`, capturing placeholder values.
///
/// The query string, a trailing slash and an `/api` or `/api/vN` prefix are ignored.
#[must_use]
pub fn match_path(template: &str, path: &str) -> Option<RouteParams> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let path = match API_PREFIX_RE.find(path) {
        Some(m) => &path[m.end() - usize::from(m.as_str().ends_with('/'))..],
        None => path,
    };
    let path = path.trim_end_matches('/');

    let template_segments: Vec<&str> = template.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if template_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (expected, actual) in template_segments.iter().zip(&path_segments) {
        match placeholder(expected) {
            Some(key) => {
                if actual.is_empty() {
                    return None;
                }
                let decoded = urlencoding::decode(actual).ok()?;
                params = params.with(key, decoded);
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}

/// Mask the token segment of a `/webhooks/<id>/<token>/...` path for logs and errors.
///
/// Paths without a token segment are returned unchanged.
#[must_use]
pub fn redact_token(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').collect();
    if let Some(pos) = segments.iter().position(|s| *s == "webhooks") {
        if let Some(token) = segments.get_mut(pos + 2).filter(|t| !t.is_empty()) {
            *token = "***";
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE_TEMPLATE: &str = "/webhooks/{webhook.id}/{webhook.token}/messages/{message.id}";

    #[test]
    fn lists_placeholders_in_order() {
        assert_eq!(
            placeholders(MESSAGE_TEMPLATE),
            vec!["webhook.id", "webhook.token", "message.id"]
        );
        assert!(placeholders("/gateway").is_empty());
    }

    #[test]
    fn renders_and_encodes_values() {
        let params = RouteParams::new().webhook(10).token("a/b c").message(20);
        assert_eq!(
            render(MESSAGE_TEMPLATE, &params).unwrap(),
            "/webhooks/10/a%2Fb%20c/messages/20"
        );
    }

    #[test]
    fn render_reports_missing_values() {
        let err = render(MESSAGE_TEMPLATE, &RouteParams::new().webhook(1)).unwrap_err();
        assert!(format!("{err}").contains("{webhook.token}"));

        let empty_token = RouteParams::new().webhook(1).token("").message(2);
        assert!(render(MESSAGE_TEMPLATE, &empty_token).is_err());
    }

    #[test]
    fn matches_paths_with_prefix_query_and_slash() {
        let params = match_path(
            MESSAGE_TEMPLATE,
            "/api/v10/webhooks/1/tok%2Fen/messages/3/?thread_id=9",
        )
        .unwrap();
        assert_eq!(params.get("webhook.id"), Some("1"));
        assert_eq!(params.get("webhook.token"), Some("tok/en"));
        assert_eq!(params.get("message.id"), Some("3"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn rejects_mismatched_paths() {
        assert!(match_path(MESSAGE_TEMPLATE, "/webhooks/1/tok/messages").is_none());
        assert!(match_path(MESSAGE_TEMPLATE, "/webhooks/1/tok/replies/3").is_none());
        assert!(match_path("/webhooks/{webhook.id}", "/webhooks/").is_none());
        assert!(match_path("/webhooks/{webhook.id}", "/apiary/webhooks/1").is_none());
    }

    #[test]
    fn redacts_webhook_token_segment() {
        assert_eq!(
            redact_token("/api/v10/webhooks/1/SUPERSECRETTOKEN/messages/3"),
            "/api/v10/webhooks/1/***/messages/3"
        );
        assert_eq!(redact_token("/api/v10/webhooks/1/tok"), "/api/v10/webhooks/1/***");
        assert_eq!(redact_token("/api/v10/webhooks/1"), "/api/v10/webhooks/1");
        assert_eq!(redact_token("/api/v10/webhooks/1/"), "/api/v10/webhooks/1/");
        assert_eq!(
            redact_token("/api/v10/channels/5/webhooks"),
            "/api/v10/channels/5/webhooks"
        );
    }
}
