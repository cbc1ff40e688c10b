use async_trait::async_trait;
use discord_webhooks::clients::{DiscordClient, ExecuteOptions, Transport, TransportResponse};
use discord_webhooks::core::Snowflake;
use discord_webhooks::core::config::AppConfig;
use discord_webhooks::core::models::{
    CreateWebhookParams, EditWebhookMessageParams, ExecuteWebhookParams, ModifyWebhookParams,
};
use discord_webhooks::errors::DiscordError;
use discord_webhooks::routes::{Operation, RouteParams};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    url: String,
    authorization: Option<String>,
    body: Option<Value>,
}

/// Records every request and answers from a queue of canned responses
#[derive(Default)]
struct FakeTransport {
    requests: Mutex<Vec<Recorded>>,
    responses: Mutex<VecDeque<TransportResponse>>,
}

impl FakeTransport {
    fn respond(self: &Arc<Self>, status: u16, body: &str) -> Arc<Self> {
        self.respond_with(TransportResponse::new(status, body))
    }

    fn respond_with(self: &Arc<Self>, response: TransportResponse) -> Arc<Self> {
        self.responses.lock().unwrap().push_back(response);
        Arc::clone(self)
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: reqwest::Request) -> Result<TransportResponse, DiscordError> {
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .map(|b| serde_json::from_slice(b).unwrap());
        self.requests.lock().unwrap().push(Recorded {
            method: request.method().to_string(),
            url: request.url().to_string(),
            authorization: request
                .headers()
                .get(reqwest::header::AUTHORIZATION)
                .map(|v| v.to_str().unwrap().to_string()),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DiscordError::HttpError("no canned response left".to_string()))
    }
}

const BASE: &str = "http://discord.test/api/v10";

fn webhook_json(id: u64, kind: u8) -> String {
    json!({
        "id": id.to_string(),
        "type": kind,
        "channel_id": "500",
        "guild_id": "600",
        "name": "hook",
        "token": "tok"
    })
    .to_string()
}

fn message_json(id: u64) -> String {
    json!({
        "id": id.to_string(),
        "channel_id": "500",
        "content": "hello",
        "webhook_id": "1"
    })
    .to_string()
}

fn client_with(transport: &Arc<FakeTransport>, bot_token: Option<&str>) -> DiscordClient {
    let config = AppConfig {
        bot_token: bot_token.map(str::to_string),
        api_base_url: BASE.to_string(),
        ..AppConfig::default()
    };
    DiscordClient::with_transport(&config, transport.clone())
}

#[tokio::test]
async fn test_create_webhook_posts_to_channel() {
    let transport = Arc::new(FakeTransport::default()).respond(200, &webhook_json(1, 1));
    let client = client_with(&transport, Some("bot"));

    let hook = client
        .create_webhook(Snowflake(500), &CreateWebhookParams::new("Deploys"))
        .await
        .unwrap();
    assert_eq!(hook.id, Snowflake(1));

    let reqs = transport.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, "POST");
    assert_eq!(reqs[0].url, format!("{BASE}/channels/500/webhooks"));
    assert_eq!(reqs[0].authorization.as_deref(), Some("Bot bot"));
    assert_eq!(reqs[0].body, Some(json!({ "name": "Deploys" })));
}

#[tokio::test]
async fn test_create_webhook_rejects_reserved_name_without_request() {
    let transport = Arc::new(FakeTransport::default());
    let client = client_with(&transport, Some("bot"));

    let err = client
        .create_webhook(Snowflake(500), &CreateWebhookParams::new("clyde"))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscordError::ValidationError(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_list_routes() {
    let list = format!("[{},{}]", webhook_json(1, 1), webhook_json(2, 3));
    let transport = Arc::new(FakeTransport::default())
        .respond(200, &list)
        .respond(200, "[]");
    let client = client_with(&transport, Some("bot"));

    let channel_hooks = client.get_channel_webhooks(Snowflake(500)).await.unwrap();
    assert_eq!(channel_hooks.len(), 2);
    let guild_hooks = client.get_guild_webhooks(Snowflake(600)).await.unwrap();
    assert!(guild_hooks.is_empty());

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{BASE}/channels/500/webhooks"),
            format!("{BASE}/guilds/600/webhooks"),
        ]
    );
}

#[tokio::test]
async fn test_get_and_modify_with_and_without_token() {
    let transport = Arc::new(FakeTransport::default())
        .respond(200, &webhook_json(7, 1))
        .respond(200, &webhook_json(7, 1))
        .respond(200, &webhook_json(7, 1))
        .respond(200, &webhook_json(7, 1));
    let client = client_with(&transport, Some("bot"));

    client.get_webhook(Snowflake(7)).await.unwrap();
    client.get_webhook_with_token(Snowflake(7), "tok").await.unwrap();
    client
        .modify_webhook(
            Snowflake(7),
            &ModifyWebhookParams::new().with_channel(Snowflake(501)),
        )
        .await
        .unwrap();
    client
        .modify_webhook_with_token(
            Snowflake(7),
            "tok",
            &ModifyWebhookParams::new().with_name("Renamed"),
        )
        .await
        .unwrap();

    let reqs = transport.requests();
    let summary: Vec<(&str, &str, bool)> = reqs
        .iter()
        .map(|r| {
            (
                r.method.as_str(),
                r.url.trim_start_matches(BASE),
                r.authorization.is_some(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("GET", "/webhooks/7", true),
            ("GET", "/webhooks/7/tok", false),
            ("PATCH", "/webhooks/7", true),
            ("PATCH", "/webhooks/7/tok", false),
        ]
    );
    assert_eq!(reqs[2].body, Some(json!({ "channel_id": "501" })));
    assert_eq!(reqs[3].body, Some(json!({ "name": "Renamed" })));
}

#[tokio::test]
async fn test_modify_with_token_refuses_channel_move() {
    let transport = Arc::new(FakeTransport::default());
    let client = client_with(&transport, None);

    let err = client
        .modify_webhook_with_token(
            Snowflake(7),
            "tok",
            &ModifyWebhookParams::new().with_channel(Snowflake(1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DiscordError::ValidationError(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_deletes_accept_empty_responses() {
    let transport = Arc::new(FakeTransport::default())
        .respond(204, "")
        .respond(204, "")
        .respond(204, "");
    let client = client_with(&transport, Some("bot"));

    client.delete_webhook(Snowflake(7)).await.unwrap();
    client.delete_webhook_with_token(Snowflake(7), "tok").await.unwrap();
    client
        .delete_webhook_message(Snowflake(7), "tok", Snowflake(9), Some(Snowflake(3)))
        .await
        .unwrap();

    let reqs = transport.requests();
    assert!(reqs.iter().all(|r| r.method == "DELETE"));
    assert_eq!(reqs[2].url, format!("{BASE}/webhooks/7/tok/messages/9?thread_id=3"));
}

#[tokio::test]
async fn test_execute_webhook_with_and_without_wait() {
    let transport = Arc::new(FakeTransport::default())
        .respond(204, "")
        .respond(200, &message_json(99));
    let client = client_with(&transport, None);
    let params = ExecuteWebhookParams::text("hello").with_username("CI");

    let none = client
        .execute_webhook(Snowflake(1), "tok", &params, ExecuteOptions::default())
        .await
        .unwrap();
    assert!(none.is_none());

    let message = client
        .execute_webhook(
            Snowflake(1),
            "tok",
            &params,
            ExecuteOptions::wait().in_thread(Snowflake(77)),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(message.id, Snowflake(99));
    assert_eq!(message.webhook_id, Some(Snowflake(1)));

    let reqs = transport.requests();
    assert_eq!(reqs[0].url, format!("{BASE}/webhooks/1/tok"));
    assert_eq!(reqs[1].url, format!("{BASE}/webhooks/1/tok?wait=true&thread_id=77"));
    assert_eq!(
        reqs[1].body,
        Some(json!({ "content": "hello", "username": "CI" }))
    );
    assert!(reqs.iter().all(|r| r.authorization.is_none()));
}

#[tokio::test]
async fn test_execute_rejects_empty_message() {
    let transport = Arc::new(FakeTransport::default());
    let client = client_with(&transport, None);

    let result = client
        .execute_webhook(
            Snowflake(1),
            "tok",
            &ExecuteWebhookParams::default(),
            ExecuteOptions::default(),
        )
        .await;
    assert!(matches!(result, Err(DiscordError::ValidationError(_))));
}

#[tokio::test]
async fn test_compatible_webhooks_forward_payload() {
    let transport = Arc::new(FakeTransport::default())
        .respond(200, "ok")
        .respond(204, "");
    let client = client_with(&transport, None);

    let slack = json!({ "text": "from slack" });
    let github = json!({ "zen": "Keep it logically awesome." });
    client
        .execute_slack_compatible_webhook(Snowflake(1), "tok", &slack, ExecuteOptions::wait())
        .await
        .unwrap();
    client
        .execute_github_compatible_webhook(Snowflake(1), "tok", &github, ExecuteOptions::default())
        .await
        .unwrap();

    let reqs = transport.requests();
    assert_eq!(reqs[0].url, format!("{BASE}/webhooks/1/tok/slack?wait=true"));
    assert_eq!(reqs[0].body, Some(slack));
    assert_eq!(reqs[1].url, format!("{BASE}/webhooks/1/tok/github"));
    assert_eq!(reqs[1].body, Some(github));
}

#[tokio::test]
async fn test_webhook_message_get_and_edit() {
    let transport = Arc::new(FakeTransport::default())
        .respond(200, &message_json(9))
        .respond(200, &message_json(9));
    let client = client_with(&transport, None);

    let msg = client
        .get_webhook_message(Snowflake(1), "tok", Snowflake(9), None)
        .await
        .unwrap();
    assert_eq!(msg.content, "hello");

    client
        .edit_webhook_message(
            Snowflake(1),
            "tok",
            Snowflake(9),
            &EditWebhookMessageParams::content("edited"),
            None,
        )
        .await
        .unwrap();

    let reqs = transport.requests();
    assert_eq!(reqs[0].method, "GET");
    assert_eq!(reqs[1].method, "PATCH");
    assert_eq!(reqs[1].url, format!("{BASE}/webhooks/1/tok/messages/9"));
    assert_eq!(reqs[1].body, Some(json!({ "content": "edited" })));
}

#[tokio::test]
async fn test_api_errors_and_rate_limits_surface() {
    let transport = Arc::new(FakeTransport::default())
        .respond(404, r#"{"message":"Unknown Webhook","code":10015}"#)
        .respond(429, r#"{"message":"You are being rate limited.","retry_after":0.25,"global":false}"#);
    let client = client_with(&transport, Some("bot"));

    match client.get_webhook(Snowflake(1)).await.unwrap_err() {
        DiscordError::ApiError { status, code, .. } => {
            assert_eq!(status, 404);
            assert_eq!(code, 10015);
        }
        other => panic!("Expected ApiError, got: {other:?}"),
    }

    match client.get_webhook(Snowflake(1)).await.unwrap_err() {
        DiscordError::RateLimited { retry_after } => assert_eq!(retry_after, Some(0.25)),
        other => panic!("Expected RateLimited, got: {other:?}"),
    }

    // No retries: exactly one request per call
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_rate_limit_without_json_body_uses_headers() {
    let transport = Arc::new(FakeTransport::default())
        .respond_with(
            TransportResponse::new(429, "<html>error code: 1015</html>").with_retry_after(30.0),
        )
        .respond(429, "");
    let client = client_with(&transport, None);

    match client
        .get_webhook_with_token(Snowflake(1), "tok")
        .await
        .unwrap_err()
    {
        DiscordError::RateLimited { retry_after } => assert_eq!(retry_after, Some(30.0)),
        other => panic!("Expected RateLimited, got: {other:?}"),
    }

    // Nothing to go on: the delay is unknown rather than zero
    match client
        .get_webhook_with_token(Snowflake(1), "tok")
        .await
        .unwrap_err()
    {
        DiscordError::RateLimited { retry_after } => assert_eq!(retry_after, None),
        other => panic!("Expected RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_success_body_is_parse_error() {
    let transport = Arc::new(FakeTransport::default()).respond(200, "{\"id\":");
    let client = client_with(&transport, Some("bot"));

    let err = client.get_webhook(Snowflake(1)).await.unwrap_err();
    match err {
        DiscordError::ParseError(msg) => assert!(msg.contains("getWebhook")),
        other => panic!("Expected ParseError, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_generic_call_dispatches_by_operation() {
    let transport = Arc::new(FakeTransport::default())
        .respond(200, &webhook_json(3, 1))
        .respond(204, "");
    let client = client_with(&transport, None);

    let op: Operation = "getWebhookwithToken".parse().unwrap();
    let params = RouteParams::new().webhook(3).token("tok");
    let value = client.call(op, &params, &[], None).await.unwrap().unwrap();
    assert_eq!(value["id"], "3");

    let empty = client
        .call(Operation::DeleteWebhookWithToken, &params, &[], None)
        .await
        .unwrap();
    assert!(empty.is_none());

    let err = client
        .call(Operation::GetWebhookMessage, &params, &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, DiscordError::RouteError(_)));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_token_is_percent_encoded_in_path() {
    let transport = Arc::new(FakeTransport::default()).respond(200, &webhook_json(3, 1));
    let client = client_with(&transport, None);

    client
        .get_webhook_with_token(Snowflake(3), "a/b?c")
        .await
        .unwrap();
    assert_eq!(
        transport.requests()[0].url,
        format!("{BASE}/webhooks/3/a%2Fb%3Fc")
    );
}
