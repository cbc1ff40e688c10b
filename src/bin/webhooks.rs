// Small inspection tool for the webhook route table and the webhook API.
//
//   webhooks routes
//   webhooks resolve <METHOD> <PATH>
//   webhooks parse-url <WEBHOOK_URL>
//   webhooks get <WEBHOOK_ID>            (needs DISCORD_BOT_TOKEN)
//   webhooks get-url <WEBHOOK_URL>
//   webhooks channel <CHANNEL_ID>        (needs DISCORD_BOT_TOKEN)

use anyhow::{Context, Result, bail};
use discord_webhooks::clients::DiscordClient;
use discord_webhooks::core::Snowflake;
use discord_webhooks::core::config::AppConfig;
use discord_webhooks::core::models::Webhook;
use discord_webhooks::routes::{self, HttpMethod, ROUTES};
use discord_webhooks::utils::parse_webhook_url;
use tracing::info;

const USAGE: &str = "usage: webhooks <routes | resolve METHOD PATH | parse-url URL | get ID | get-url URL | channel ID>";

#[tokio::main]
async fn main() -> Result<()> {
    discord_webhooks::setup_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    match (command.as_str(), &args[1..]) {
        ("routes", []) => {
            for route in &ROUTES {
                println!(
                    "{:<7} {:<64} {}",
                    route.method, route.template, route.operation
                );
            }
        }
        ("resolve", [method, path]) => {
            let method: HttpMethod = method.parse()?;
            match routes::resolve(method, path) {
                Some((operation, params)) => println!("{operation} {params:?}"),
                None => bail!("no webhook route for {method} {path}"),
            }
        }
        ("parse-url", [url]) => {
            let (id, token) = parse_webhook_url(url)?;
            println!("id={id} token={}", redact(&token));
        }
        ("get", [id]) => {
            let client = client()?;
            let id: Snowflake = id.parse()?;
            print_webhook(&client.get_webhook(id).await?);
        }
        ("get-url", [url]) => {
            let client = client()?;
            let (id, token) = parse_webhook_url(url)?;
            print_webhook(&client.get_webhook_with_token(id, &token).await?);
        }
        ("channel", [id]) => {
            let client = client()?;
            let id: Snowflake = id.parse()?;
            let hooks = client.get_channel_webhooks(id).await?;
            info!(channel_id = %id, count = hooks.len(), "Fetched channel webhooks");
            for hook in &hooks {
                print_webhook(hook);
            }
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

fn client() -> Result<DiscordClient> {
    let config = AppConfig::from_env().context("loading configuration")?;
    DiscordClient::new(&config).context("building HTTP client")
}

fn print_webhook(hook: &Webhook) {
    println!(
        "{} [{}] name={} channel={} token={}",
        hook.id,
        hook.kind,
        hook.name.as_deref().unwrap_or("-"),
        hook.channel_id.map_or_else(|| "-".to_string(), |c| c.to_string()),
        hook.token.as_deref().map_or_else(|| "-".to_string(), redact),
    );
}

fn redact(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{visible}…")
}
