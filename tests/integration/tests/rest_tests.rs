//! REST pipeline against the mock API
//!
//! Run with: cargo test -p integration-tests --test rest_tests

use cord_common::ClientError;
use cord_core::{Channel, LocalMessage, Snowflake, User};
use cord_rest::api::routes;
use cord_rest::{RestChannel, RestRequestOptions, RetrievalDirection};
use integration_tests::mock_api::TEST_TOKEN;
use integration_tests::*;

// ============================================================================
// Retries
// ============================================================================

#[tokio::test]
async fn test_rate_limited_request_is_retried() {
    let api = MockApi::start().await.unwrap();
    api.on("GET", "/users/@me", MockResponse::rate_limited(0.05, false));
    api.on("GET", "/users/@me", MockResponse::json(user(BOT_ID, "cord-bot")));

    let client = api.client().unwrap();
    let me = client.fetch_current_user().await.unwrap();

    assert_eq!(me.name(), "cord-bot");
    assert_eq!(api.requests_to("GET", "/users/@me").len(), 2);
}

#[tokio::test]
async fn test_rate_limit_retries_are_bounded() {
    let api = MockApi::start().await.unwrap();
    api.on("GET", "/users/@me", MockResponse::rate_limited(0.01, false));

    let mut config = api.config();
    config.rest.max_retries = 1;
    let client = api.client_with(&config).unwrap();

    match client.fetch_current_user().await {
        Err(ClientError::RateLimited { global, .. }) => assert!(!global),
        other => panic!("expected rate limit error, got {other:?}"),
    }
    assert_eq!(api.requests_to("GET", "/users/@me").len(), 2);
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let api = MockApi::start().await.unwrap();
    api.on("GET", "/users/@me", MockResponse::error(502, 0, "Bad Gateway"));
    api.on("GET", "/users/@me", MockResponse::json(user(BOT_ID, "cord-bot")));

    let client = api.client().unwrap();
    client.fetch_current_user().await.unwrap();
    assert_eq!(api.requests_to("GET", "/users/@me").len(), 2);
}

#[tokio::test]
async fn test_client_error_is_typed_and_not_retried() {
    let api = MockApi::start().await.unwrap();
    api.on(
        "DELETE",
        "/guilds/10/members/1",
        MockResponse::error(403, 50013, "Missing Permissions"),
    );

    let client = api.client().unwrap();
    let err = client
        .kick_member(Snowflake::new(GUILD_ID), Snowflake::new(1), None)
        .await
        .unwrap_err();

    match &err {
        ClientError::Http {
            status,
            code,
            message,
            ..
        } => {
            assert_eq!(*status, 403);
            assert_eq!(*code, 50013);
            assert_eq!(message, "Missing Permissions");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert!(err.is_client_error());
    assert_eq!(api.requests().len(), 1);
}

// ============================================================================
// Headers
// ============================================================================

#[tokio::test]
async fn test_bucket_headers_are_learned() {
    let api = MockApi::start().await.unwrap();
    api.on(
        "GET",
        "/channels/20",
        MockResponse::json(channel(CHANNEL_ID, "general"))
            .with_header("x-ratelimit-bucket", "abcd1234")
            .with_header("x-ratelimit-limit", "5")
            .with_header("x-ratelimit-remaining", "4")
            .with_header("x-ratelimit-reset-after", "1.0"),
    );

    let client = api.client().unwrap();
    let channel = client.fetch_channel(Snowflake::new(CHANNEL_ID)).await.unwrap();
    assert!(matches!(channel, RestChannel::Guild(_)));

    let route = routes::GET_CHANNEL.format(&[&CHANNEL_ID]);
    assert_eq!(
        client.dispatcher().limiter().learned_hash(&route).as_deref(),
        Some("abcd1234")
    );
}

#[tokio::test]
async fn test_authorization_and_reason_headers() {
    let api = MockApi::start().await.unwrap();
    api.on("DELETE", "/guilds/10/members/1", MockResponse::no_content());

    let client = api.client().unwrap();
    let options = RestRequestOptions::new().with_reason("spam bot");
    client
        .kick_member(Snowflake::new(GUILD_ID), Snowflake::new(1), Some(&options))
        .await
        .unwrap();

    let request = &api.requests_to("DELETE", "/guilds/10/members/1")[0];
    assert_eq!(
        request.header("authorization"),
        Some(format!("Bot {TEST_TOKEN}").as_str())
    );
    assert_eq!(request.header("x-audit-log-reason"), Some("spam%20bot"));
}

#[tokio::test]
async fn test_send_message_body() {
    let api = MockApi::start().await.unwrap();
    api.on(
        "POST",
        "/channels/20/messages",
        MockResponse::json(message(500, CHANNEL_ID, "hello")),
    );

    let client = api.client().unwrap();
    let sent = client
        .send_message(
            Snowflake::new(CHANNEL_ID),
            &LocalMessage::new().with_content("hello"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(sent.model().content, "hello");
    let request = &api.requests_to("POST", "/channels/20/messages")[0];
    assert_eq!(request.body.as_ref().unwrap()["content"], "hello");
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_message_history_pagination() {
    let api = MockApi::start().await.unwrap();
    api.on("GET", "/channels/20/messages", MockResponse::json(message_page(CHANNEL_ID, 300, 100)));
    api.on("GET", "/channels/20/messages", MockResponse::json(message_page(CHANNEL_ID, 200, 20)));

    let client = api.client().unwrap();
    let messages = client
        .enumerate_messages(Snowflake::new(CHANNEL_ID), 150, RetrievalDirection::Before, None)
        .unwrap()
        .collect()
        .await
        .unwrap();

    // The second page came back short, so enumeration stops there
    assert_eq!(messages.len(), 120);

    let requests = api.requests_to("GET", "/channels/20/messages");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query.as_deref(), Some("limit=100"));
    assert_eq!(requests[1].query.as_deref(), Some("limit=50&before=201"));
}

#[tokio::test]
async fn test_member_pagination_uses_full_pages() {
    let api = MockApi::start().await.unwrap();
    let page = |first: u64, count: u64| {
        serde_json::Value::Array(
            (first..first + count)
                .map(|id| serde_json::json!({"user": user(id, "member"), "roles": []}))
                .collect(),
        )
    };
    api.on("GET", "/guilds/10/members", MockResponse::json(page(1, 1000)));
    api.on("GET", "/guilds/10/members", MockResponse::json(page(1001, 5)));

    let client = api.client().unwrap();
    let members = client
        .enumerate_members(Snowflake::new(GUILD_ID), 2000, None)
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(members.len(), 1005);
    let requests = api.requests_to("GET", "/guilds/10/members");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].query.as_deref(), Some("limit=1000&after=1000"));
}

#[tokio::test]
async fn test_member_page_without_user_is_a_decode_error() {
    let api = MockApi::start().await.unwrap();
    api.on(
        "GET",
        "/guilds/10/members",
        MockResponse::json(serde_json::json!([
            {"user": user(1, "alice"), "roles": []},
            {"nick": "ghost", "roles": []}
        ])),
    );

    let client = api.client().unwrap();
    let result = client
        .fetch_members_page(Snowflake::new(GUILD_ID), 1000, None)
        .await;
    assert!(matches!(result, Err(ClientError::Decode(_))));
}

#[tokio::test]
async fn test_around_requires_anchor() {
    let api = MockApi::start().await.unwrap();
    let client = api.client().unwrap();
    let result =
        client.enumerate_messages(Snowflake::new(CHANNEL_ID), 10, RetrievalDirection::Around, None);
    assert!(matches!(result, Err(ClientError::Argument(_))));
    assert!(api.requests().is_empty());
}

// ============================================================================
// Entities
// ============================================================================

#[tokio::test]
async fn test_group_dm_name_fallback_and_leave() {
    let api = MockApi::start().await.unwrap();
    api.on("GET", "/channels/7", MockResponse::json(group_dm(7, None)));
    api.on("DELETE", "/channels/7", MockResponse::json(group_dm(7, None)));

    let client = api.client().unwrap();
    let channel = client.fetch_channel(Snowflake::new(7)).await.unwrap();
    let group = channel.as_group_dm().unwrap();

    assert_eq!(group.name().as_deref(), Some("alice, bob"));
    assert_eq!(group.owner().map(|owner| owner.name()), Some("alice".to_string()));

    group.leave(None).await.unwrap();
    assert_eq!(api.requests_to("DELETE", "/channels/7").len(), 1);
}

#[tokio::test]
async fn test_not_found() {
    let api = MockApi::start().await.unwrap();
    let client = api.client().unwrap();
    let err = client.fetch_channel(Snowflake::new(404)).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}
