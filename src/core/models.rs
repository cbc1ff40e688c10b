//! Resource objects returned by the webhook endpoints.

pub mod channel;
pub mod guild;
pub mod message;
pub mod user;
pub mod webhook;

pub use channel::PartialChannel;
pub use guild::PartialGuild;
pub use message::{EditWebhookMessageParams, ExecuteWebhookParams, Message};
pub use user::User;
pub use webhook::{CreateWebhookParams, ModifyWebhookParams, Webhook, WebhookType};
