//! discord-webhooks - typed bindings for Discord's webhook REST resource.
//!
//! The crate describes the webhook resource of the Discord HTTP API and
//! dispatches calls against it:
//! 1. `core` holds the resource objects (`Webhook`, `WebhookType`, parameter objects)
//! 2. `routes` binds each HTTP method + path template to a named operation
//! 3. `clients` renders those routes and maps responses to typed values
//! 4. `gateway` decodes the `WEBHOOKS_UPDATE` dispatch
//!
//! Rate limiting, retries, pagination and caching are left to the caller; a
//! 429 surfaces as `DiscordError::RateLimited` and is never waited on.
//!
//! # Example
//!
//! ```no_run
//! use discord_webhooks::clients::{DiscordClient, ExecuteOptions};
//! use discord_webhooks::core::config::AppConfig;
//! use discord_webhooks::core::models::ExecuteWebhookParams;
//! use discord_webhooks::utils::parse_webhook_url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     discord_webhooks::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let client = DiscordClient::new(&config)?;
//!
//!     let (id, token) = parse_webhook_url("https://discord.com/api/webhooks/123/abc")?;
//!     let message = client
//!         .execute_webhook(
//!             id,
//!             &token,
//!             &ExecuteWebhookParams::text("Build #42 passed").with_username("CI"),
//!             ExecuteOptions::wait(),
//!         )
//!         .await?;
//!
//!     if let Some(message) = message {
//!         println!("Posted message {}", message.id);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod core;
pub mod errors;
pub mod gateway;
pub mod routes;
pub mod utils;

pub use errors::DiscordError;

/// Configure structured JSON logging.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless: later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// discord_webhooks::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
