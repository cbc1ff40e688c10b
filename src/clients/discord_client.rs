//! Discord webhook API client module
//!
//! Renders routes from the route table, sends them through a [`Transport`],
//! and maps each response to one typed value or one error.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Body, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::transport::{ReqwestTransport, Transport, TransportResponse};
use crate::core::config::AppConfig;
use crate::core::models::{
    CreateWebhookParams, EditWebhookMessageParams, ExecuteWebhookParams, Message,
    ModifyWebhookParams, Webhook,
};
use crate::core::Snowflake;
use crate::errors::DiscordError;
use crate::routes::template::redact_token;
use crate::routes::{Operation, RouteParams};

const CLIENT_USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_NAME"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Discord error body: `{ "code": 10015, "message": "Unknown Webhook" }`.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: u64,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct RateLimitBody {
    #[serde(default)]
    retry_after: Option<f64>,
}

/// Query options for the execute routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Wait for the server to confirm the message and return it.
    pub wait: bool,
    /// Post into this thread of the webhook's channel.
    pub thread_id: Option<Snowflake>,
}

impl ExecuteOptions {
    #[must_use]
    pub fn wait() -> Self {
        Self {
            wait: true,
            thread_id: None,
        }
    }

    #[must_use]
    pub fn in_thread(mut self, thread_id: Snowflake) -> Self {
        self.thread_id = Some(thread_id);
        self
    }

    fn query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if self.wait {
            query.push(("wait", "true".to_string()));
        }
        if let Some(thread_id) = self.thread_id {
            query.push(("thread_id", thread_id.to_string()));
        }
        query
    }
}

fn thread_query(thread_id: Option<Snowflake>) -> Vec<(&'static str, String)> {
    thread_id
        .map(|id| vec![("thread_id", id.to_string())])
        .unwrap_or_default()
}

/// Discord webhook API client
pub struct DiscordClient {
    transport: Arc<dyn Transport>,
    api_base_url: String,
    bot_token: Option<String>,
}

impl DiscordClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, DiscordError> {
        let transport = ReqwestTransport::new(config.http_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    #[must_use]
    pub fn with_transport(config: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
        }
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Build the HTTP request for `operation` without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if a route parameter is missing, the URL is invalid,
    /// or the route needs a bot token and none is configured.
    pub fn build_request(
        &self,
        operation: Operation,
        params: &RouteParams,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Request, DiscordError> {
        let route = operation.route();
        let path = route.render(params)?;

        let mut url = Url::parse(&format!("{}{path}", self.api_base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        if !route.uses_webhook_token() {
            let token = self.bot_token.as_deref().ok_or_else(|| {
                DiscordError::ConfigError(format!("{operation} requires a bot token"))
            })?;
            let value = HeaderValue::from_str(&format!("Bot {token}"))
                .map_err(|e| DiscordError::ConfigError(format!("invalid bot token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut request = Request::new(route.method.into(), url);
        if let Some(body) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(Body::from(serde_json::to_vec(body)?));
        }
        *request.headers_mut() = headers;

        Ok(request)
    }

    async fn send(
        &self,
        operation: Operation,
        params: &RouteParams,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<TransportResponse, DiscordError> {
        let request = self.build_request(operation, params, query, body)?;
        debug!(
            operation = %operation,
            method = %request.method(),
            path = %redact_token(request.url().path()),
            "Sending Discord API request"
        );

        let resp = self.transport.send(request).await?;
        if resp.is_success() {
            return Ok(resp);
        }

        Err(error_from_response(operation, &resp))
    }

    /// Dispatch any operation with untyped parameters and body.
    ///
    /// Returns `None` when the server answers without a body (e.g. 204).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx response, or an undecodable body.
    pub async fn call(
        &self,
        operation: Operation,
        params: &RouteParams,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, DiscordError> {
        let resp = self.send(operation, params, query, body).await?;
        if resp.body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&resp.body)?))
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        params: &RouteParams,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T, DiscordError> {
        let resp = self.send(operation, params, query, body).await?;
        serde_json::from_str(&resp.body).map_err(|e| {
            DiscordError::ParseError(format!("{operation} response: {e}"))
        })
    }

    async fn request_empty(
        &self,
        operation: Operation,
        params: &RouteParams,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<(), DiscordError> {
        self.send(operation, params, query, body).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the name is invalid or the API call fails.
    pub async fn create_webhook(
        &self,
        channel_id: Snowflake,
        params: &CreateWebhookParams,
    ) -> Result<Webhook, DiscordError> {
        params.validate()?;
        let body = to_body(params)?;
        let webhook: Webhook = self
            .request_json(
                Operation::CreateWebhook,
                &RouteParams::new().channel(channel_id),
                &[],
                Some(&body),
            )
            .await?;
        info!(webhook_id = %webhook.id, channel_id = %channel_id, "Created webhook");
        Ok(webhook)
    }

    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn get_channel_webhooks(
        &self,
        channel_id: Snowflake,
    ) -> Result<Vec<Webhook>, DiscordError> {
        self.request_json(
            Operation::GetChannelWebhooks,
            &RouteParams::new().channel(channel_id),
            &[],
            None,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn get_guild_webhooks(&self, guild_id: Snowflake) -> Result<Vec<Webhook>, DiscordError> {
        self.request_json(
            Operation::GetGuildWebhooks,
            &RouteParams::new().guild(guild_id),
            &[],
            None,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn get_webhook(&self, webhook_id: Snowflake) -> Result<Webhook, DiscordError> {
        self.request_json(
            Operation::GetWebhook,
            &RouteParams::new().webhook(webhook_id),
            &[],
            None,
        )
        .await
    }

    /// Same as [`Self::get_webhook`] but authenticated by the webhook token; the
    /// response carries no `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn get_webhook_with_token(
        &self,
        webhook_id: Snowflake,
        token: &str,
    ) -> Result<Webhook, DiscordError> {
        self.request_json(
            Operation::GetWebhookWithToken,
            &RouteParams::new().webhook(webhook_id).token(token),
            &[],
            None,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if a new name is invalid or the API call fails.
    pub async fn modify_webhook(
        &self,
        webhook_id: Snowflake,
        params: &ModifyWebhookParams,
    ) -> Result<Webhook, DiscordError> {
        params.validate()?;
        let body = to_body(params)?;
        self.request_json(
            Operation::ModifyWebhook,
            &RouteParams::new().webhook(webhook_id),
            &[],
            Some(&body),
        )
        .await
    }

    /// Token-authenticated modify. Moving the webhook to another channel needs
    /// a bot credential, so `channel_id` is refused here.
    ///
    /// # Errors
    ///
    /// Returns an error if `channel_id` is set, a new name is invalid, or the API call fails.
    pub async fn modify_webhook_with_token(
        &self,
        webhook_id: Snowflake,
        token: &str,
        params: &ModifyWebhookParams,
    ) -> Result<Webhook, DiscordError> {
        if params.channel_id.is_some() {
            return Err(DiscordError::ValidationError(
                "channel_id cannot be changed with a webhook token".to_string(),
            ));
        }
        params.validate()?;
        let body = to_body(params)?;
        self.request_json(
            Operation::ModifyWebhookWithToken,
            &RouteParams::new().webhook(webhook_id).token(token),
            &[],
            Some(&body),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn delete_webhook(&self, webhook_id: Snowflake) -> Result<(), DiscordError> {
        self.request_empty(
            Operation::DeleteWebhook,
            &RouteParams::new().webhook(webhook_id),
            &[],
            None,
        )
        .await?;
        info!(webhook_id = %webhook_id, "Deleted webhook");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn delete_webhook_with_token(
        &self,
        webhook_id: Snowflake,
        token: &str,
    ) -> Result<(), DiscordError> {
        self.request_empty(
            Operation::DeleteWebhookWithToken,
            &RouteParams::new().webhook(webhook_id).token(token),
            &[],
            None,
        )
        .await?;
        info!(webhook_id = %webhook_id, "Deleted webhook with token");
        Ok(())
    }

    /// Post a message through the webhook.
    ///
    /// Returns the created message when `options.wait` is set, otherwise `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message is empty or over limits, or the API call fails.
    pub async fn execute_webhook(
        &self,
        webhook_id: Snowflake,
        token: &str,
        params: &ExecuteWebhookParams,
        options: ExecuteOptions,
    ) -> Result<Option<Message>, DiscordError> {
        params.validate()?;
        let body = to_body(params)?;
        let route_params = RouteParams::new().webhook(webhook_id).token(token);
        let query = options.query();

        if options.wait {
            let message: Message = self
                .request_json(Operation::ExecuteWebhook, &route_params, &query, Some(&body))
                .await?;
            return Ok(Some(message));
        }

        self.request_empty(Operation::ExecuteWebhook, &route_params, &query, Some(&body))
            .await?;
        Ok(None)
    }

    /// Forward a Slack-formatted payload as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn execute_slack_compatible_webhook(
        &self,
        webhook_id: Snowflake,
        token: &str,
        payload: &Value,
        options: ExecuteOptions,
    ) -> Result<(), DiscordError> {
        self.request_empty(
            Operation::ExecuteSlackCompatibleWebhook,
            &RouteParams::new().webhook(webhook_id).token(token),
            &options.query(),
            Some(payload),
        )
        .await
    }

    /// Forward a GitHub event payload as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn execute_github_compatible_webhook(
        &self,
        webhook_id: Snowflake,
        token: &str,
        payload: &Value,
        options: ExecuteOptions,
    ) -> Result<(), DiscordError> {
        self.request_empty(
            Operation::ExecuteGitHubCompatibleWebhook,
            &RouteParams::new().webhook(webhook_id).token(token),
            &options.query(),
            Some(payload),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn get_webhook_message(
        &self,
        webhook_id: Snowflake,
        token: &str,
        message_id: Snowflake,
        thread_id: Option<Snowflake>,
    ) -> Result<Message, DiscordError> {
        self.request_json(
            Operation::GetWebhookMessage,
            &RouteParams::new()
                .webhook(webhook_id)
                .token(token)
                .message(message_id),
            &thread_query(thread_id),
            None,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the edit is over limits or the API call fails.
    pub async fn edit_webhook_message(
        &self,
        webhook_id: Snowflake,
        token: &str,
        message_id: Snowflake,
        params: &EditWebhookMessageParams,
        thread_id: Option<Snowflake>,
    ) -> Result<Message, DiscordError> {
        params.validate()?;
        let body = to_body(params)?;
        self.request_json(
            Operation::EditWebhookMessage,
            &RouteParams::new()
                .webhook(webhook_id)
                .token(token)
                .message(message_id),
            &thread_query(thread_id),
            Some(&body),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn delete_webhook_message(
        &self,
        webhook_id: Snowflake,
        token: &str,
        message_id: Snowflake,
        thread_id: Option<Snowflake>,
    ) -> Result<(), DiscordError> {
        self.request_empty(
            Operation::DeleteWebhookMessage,
            &RouteParams::new()
                .webhook(webhook_id)
                .token(token)
                .message(message_id),
            &thread_query(thread_id),
            None,
        )
        .await
    }
}

fn to_body<T: Serialize>(params: &T) -> Result<Value, DiscordError> {
    serde_json::to_value(params)
        .map_err(|e| DiscordError::GeneralError(format!("request body serialize: {e}")))
}

fn error_from_response(operation: Operation, resp: &TransportResponse) -> DiscordError {
    if resp.status == 429 {
        // Edge-served 429s can be HTML or empty; fall back to the headers.
        let retry_after = serde_json::from_str::<RateLimitBody>(&resp.body)
            .ok()
            .and_then(|b| b.retry_after)
            .or(resp.retry_after);
        warn!(operation = %operation, retry_after = ?retry_after, "Discord rate limit hit");
        return DiscordError::RateLimited { retry_after };
    }

    let (code, message) = match serde_json::from_str::<ApiErrorBody>(&resp.body) {
        Ok(body) => (
            body.code,
            body.message.unwrap_or_else(|| "Unknown error".to_string()),
        ),
        Err(_) if resp.body.trim().is_empty() => (0, "Unknown error".to_string()),
        Err(_) => (0, resp.body.trim().to_string()),
    };
    warn!(
        operation = %operation,
        status = resp.status,
        code,
        "Discord API error: {}",
        message
    );
    DiscordError::ApiError {
        status: resp.status,
        code,
        message,
    }
}
