//! Route bindings for the webhook resource.
//!
//! Each entry ties an HTTP method and a path template to a named operation.
//! The client renders these templates; nothing else in the crate hard-codes
//! a webhook path.

pub mod operation;
pub mod template;

pub use operation::{HttpMethod, Operation};
pub use template::RouteParams;

use crate::errors::DiscordError;

const CHANNEL_WEBHOOKS: &str = "/channels/{channel.id}/webhooks";
const GUILD_WEBHOOKS: &str = "/guilds/{guild.id}/webhooks";
const WEBHOOK: &str = "/webhooks/{webhook.id}";
const WEBHOOK_WITH_TOKEN: &str = "/webhooks/{webhook.id}/{webhook.token}";
const WEBHOOK_SLACK: &str = "/webhooks/{webhook.id}/{webhook.token}/slack";
const WEBHOOK_GITHUB: &str = "/webhooks/{webhook.id}/{webhook.token}/github";
const WEBHOOK_MESSAGE: &str = "/webhooks/{webhook.id}/{webhook.token}/messages/{message.id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub template: &'static str,
    pub operation: Operation,
}

impl Route {
    const fn new(template: &'static str, method: HttpMethod, operation: Operation) -> Self {
        Self {
            method,
            template,
            operation,
        }
    }

    /// Routes carrying `{webhook.token}` authenticate with the token, not a bot credential.
    #[must_use]
    pub fn uses_webhook_token(&self) -> bool {
        self.template.contains("{webhook.token}")
    }

    /// # Errors
    ///
    /// Returns an error if a placeholder has no value.
    pub fn render(&self, params: &RouteParams) -> Result<String, DiscordError> {
        template::render(self.template, params)
    }

    #[must_use]
    pub fn match_request(&self, method: HttpMethod, path: &str) -> Option<RouteParams> {
        if self.method != method {
            return None;
        }
        template::match_path(self.template, path)
    }
}

/// <https://discord.com/developers/docs/resources/webhook>
pub static ROUTES: [Route; 15] = [
    Route::new(CHANNEL_WEBHOOKS, HttpMethod::Post, Operation::CreateWebhook),
    Route::new(CHANNEL_WEBHOOKS, HttpMethod::Get, Operation::GetChannelWebhooks),
    Route::new(GUILD_WEBHOOKS, HttpMethod::Get, Operation::GetGuildWebhooks),
    Route::new(WEBHOOK, HttpMethod::Get, Operation::GetWebhook),
    Route::new(WEBHOOK, HttpMethod::Patch, Operation::ModifyWebhook),
    Route::new(WEBHOOK, HttpMethod::Delete, Operation::DeleteWebhook),
    Route::new(WEBHOOK_WITH_TOKEN, HttpMethod::Get, Operation::GetWebhookWithToken),
    Route::new(WEBHOOK_WITH_TOKEN, HttpMethod::Patch, Operation::ModifyWebhookWithToken),
    Route::new(WEBHOOK_WITH_TOKEN, HttpMethod::Delete, Operation::DeleteWebhookWithToken),
    Route::new(WEBHOOK_WITH_TOKEN, HttpMethod::Post, Operation::ExecuteWebhook),
    Route::new(WEBHOOK_SLACK, HttpMethod::Post, Operation::ExecuteSlackCompatibleWebhook),
    Route::new(WEBHOOK_GITHUB, HttpMethod::Post, Operation::ExecuteGitHubCompatibleWebhook),
    Route::new(WEBHOOK_MESSAGE, HttpMethod::Get, Operation::GetWebhookMessage),
    Route::new(WEBHOOK_MESSAGE, HttpMethod::Patch, Operation::EditWebhookMessage),
    Route::new(WEBHOOK_MESSAGE, HttpMethod::Delete, Operation::DeleteWebhookMessage),
];

impl Operation {
    #[must_use]
    pub fn route(self) -> &'static Route {
        // ROUTES is laid out in declaration order of `Operation`.
        &ROUTES[self as usize]
    }
}

/// Find the operation bound to a concrete request, e.g. `PATCH /webhooks/1/abc`.
#[must_use]
pub fn resolve(method: HttpMethod, path: &str) -> Option<(Operation, RouteParams)> {
    ROUTES.iter().find_map(|route| {
        route
            .match_request(method, path)
            .map(|params| (route.operation, params))
    })
}
