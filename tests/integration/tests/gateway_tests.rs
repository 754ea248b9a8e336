//! Shard lifecycle against the mock gateway
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::sync::Arc;
use std::time::Duration;

use cord_cache::{CacheProvider, MemoryCache, SharedCache};
use cord_common::Token;
use cord_core::{Channel, Guild, Snowflake};
use cord_gateway::protocol::PresenceUpdatePayload;
use cord_gateway::{
    GatewayClient, GatewayError, GatewayEvent, GatewayResult, OpCode, ShardOptions, ShardStatus,
};
use integration_tests::mock_api::TEST_TOKEN;
use integration_tests::*;
use serde_json::json;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Long enough that no heartbeat interferes unless a test wants one
const QUIET_INTERVAL_MS: u64 = 45_000;

async fn start_client(gateway: &MockGateway) -> (GatewayClient, JoinHandle<GatewayResult<()>>) {
    let api = MockApi::start().await.unwrap();
    let cache: SharedCache = Arc::new(MemoryCache::default());
    let options = ShardOptions::default()
        .with_url(gateway.url())
        .with_backoff(Duration::from_millis(10), Duration::from_millis(50));
    let client = GatewayClient::with_parts(
        api.client().unwrap(),
        cache,
        Token::bot(TEST_TOKEN).unwrap(),
        options,
    );

    let runner = client.clone();
    let handle = tokio::spawn(async move { runner.run().await });
    (client, handle)
}

/// Next event matching `predicate`, skipping the rest
async fn wait_for<F>(events: &mut broadcast::Receiver<GatewayEvent>, predicate: F) -> GatewayEvent
where
    F: Fn(&GatewayEvent) -> bool,
{
    timeout(TEST_TIMEOUT, async {
        loop {
            let event = events.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .unwrap()
}

/// Hello, Identify, READY with sequence 1
async fn handshake(gateway: &MockGateway, heartbeat_ms: u64) -> GatewayConnection {
    let mut conn = gateway.accept().await.unwrap();
    conn.hello(heartbeat_ms).await.unwrap();
    conn.expect(OpCode::Identify).await.unwrap();
    conn.dispatch("READY", 1, ready("session-1", &[GUILD_ID]))
        .await
        .unwrap();
    conn
}

async fn stop(client: &GatewayClient, handle: JoinHandle<GatewayResult<()>>) {
    client.shutdown();
    timeout(TEST_TIMEOUT, handle).await.unwrap().unwrap().unwrap();
    assert_eq!(client.shard().status(), ShardStatus::Stopped);
}

// ============================================================================
// Handshake
// ============================================================================

#[tokio::test]
async fn test_hello_identify_ready() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;
    let mut events = client.subscribe();

    let mut conn = gateway.accept().await.unwrap();
    conn.hello(QUIET_INTERVAL_MS).await.unwrap();

    let identify = conn.expect(OpCode::Identify).await.unwrap().as_identify().unwrap();
    assert_eq!(identify.token, TEST_TOKEN);
    assert_eq!(identify.shard, Some([0, 1]));
    assert_eq!(identify.properties.browser, identify.properties.device);

    conn.dispatch("READY", 1, ready("session-1", &[GUILD_ID]))
        .await
        .unwrap();
    match wait_for(&mut events, |e| matches!(e, GatewayEvent::Ready { .. })).await {
        GatewayEvent::Ready {
            session_id,
            unavailable_guilds,
            ..
        } => {
            assert_eq!(session_id, "session-1");
            assert_eq!(unavailable_guilds, vec![Snowflake::new(GUILD_ID)]);
        }
        _ => unreachable!(),
    }

    assert_eq!(client.shard().status(), ShardStatus::Connected);
    assert_eq!(client.shard().session().session_id(), Some("session-1"));
    assert_eq!(client.current_user().unwrap().snapshot().username, "cord-bot");
    assert!(client.cache().is_unavailable(Snowflake::new(GUILD_ID)));

    stop(&client, handle).await;
}

// ============================================================================
// Heartbeats
// ============================================================================

#[tokio::test]
async fn test_heartbeat_is_acknowledged() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;

    let mut conn = handshake(&gateway, 100).await;

    let beat = conn.expect(OpCode::Heartbeat).await.unwrap();
    conn.send(&cord_gateway::GatewayMessage::heartbeat_ack())
        .await
        .unwrap();

    // The second beat carries the latest sequence
    let beat_seq = conn.expect(OpCode::Heartbeat).await.unwrap().as_heartbeat_seq();
    assert!(beat.as_heartbeat_seq().is_some());
    assert_eq!(beat_seq, Some(Some(1)));
    assert!(client.shard().latency().is_some());

    stop(&client, handle).await;
}

#[tokio::test]
async fn test_server_heartbeat_request_is_answered() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;

    let mut conn = handshake(&gateway, QUIET_INTERVAL_MS).await;
    conn.send(&cord_gateway::GatewayMessage::heartbeat(None))
        .await
        .unwrap();
    let beat = conn.expect(OpCode::Heartbeat).await.unwrap();
    assert_eq!(beat.as_heartbeat_seq(), Some(Some(1)));

    stop(&client, handle).await;
}

#[tokio::test]
async fn test_missing_ack_reconnects_and_resumes() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;

    // Never acknowledge; the second due beat finds the first unacked
    let mut first = handshake(&gateway, 100).await;
    first.expect(OpCode::Heartbeat).await.unwrap();

    let mut second = gateway.accept().await.unwrap();
    second.hello(QUIET_INTERVAL_MS).await.unwrap();
    let resume = second.expect(OpCode::Resume).await.unwrap().as_resume().unwrap();
    assert_eq!(resume.session_id, "session-1");
    assert_eq!(resume.seq, 1);

    drop(first);
    stop(&client, handle).await;
}

// ============================================================================
// Reconnects
// ============================================================================

#[tokio::test]
async fn test_reconnect_opcode_resumes_session() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;
    let mut events = client.subscribe();

    let mut first = handshake(&gateway, QUIET_INTERVAL_MS).await;
    first.dispatch("GUILD_CREATE", 2, guild_create()).await.unwrap();
    wait_for(&mut events, |e| matches!(e, GatewayEvent::GuildAvailable { .. })).await;
    first
        .send(&cord_gateway::GatewayMessage::reconnect())
        .await
        .unwrap();

    let mut second = gateway.accept().await.unwrap();
    second.hello(QUIET_INTERVAL_MS).await.unwrap();
    let resume = second.expect(OpCode::Resume).await.unwrap().as_resume().unwrap();
    assert_eq!(resume.session_id, "session-1");
    assert_eq!(resume.seq, 2);

    second.dispatch("RESUMED", 3, json!({})).await.unwrap();
    wait_for(&mut events, |e| matches!(e, GatewayEvent::Resumed)).await;
    assert_eq!(client.shard().status(), ShardStatus::Connected);

    // The cache survives a resume
    assert!(client.guild(Snowflake::new(GUILD_ID)).is_some());

    stop(&client, handle).await;
}

#[tokio::test]
async fn test_invalid_session_wait_observes_shutdown() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;
    let mut events = client.subscribe();

    let mut conn = handshake(&gateway, QUIET_INTERVAL_MS).await;
    wait_for(&mut events, |e| matches!(e, GatewayEvent::Ready { .. })).await;
    conn.send(&cord_gateway::GatewayMessage::invalid_session(false))
        .await
        .unwrap();

    // The disconnect is reported before the 1-5 s wait starts
    let disconnected = timeout(Duration::from_millis(500), async {
        loop {
            if let GatewayEvent::Disconnected { will_reconnect, .. } = events.recv().await.unwrap() {
                return will_reconnect;
            }
        }
    })
    .await
    .unwrap();
    assert!(disconnected);
    assert_eq!(client.shard().session().session_id(), None);

    client.shutdown();
    timeout(Duration::from_millis(500), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(client.shard().status(), ShardStatus::Stopped);
}

#[tokio::test]
async fn test_session_invalidating_close_identifies_again() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;
    let mut events = client.subscribe();

    let first = handshake(&gateway, QUIET_INTERVAL_MS).await;
    wait_for(&mut events, |e| matches!(e, GatewayEvent::Ready { .. })).await;
    first.close(4009, "Session timed out").await.unwrap();

    match wait_for(&mut events, |e| matches!(e, GatewayEvent::Disconnected { .. })).await {
        GatewayEvent::Disconnected {
            code,
            will_reconnect,
            ..
        } => {
            assert_eq!(code, Some(4009));
            assert!(will_reconnect);
        }
        _ => unreachable!(),
    }

    let mut second = gateway.accept().await.unwrap();
    second.hello(QUIET_INTERVAL_MS).await.unwrap();
    second.expect(OpCode::Identify).await.unwrap();

    stop(&client, handle).await;
}

#[tokio::test]
async fn test_fatal_close_stops_shard() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;
    let mut events = client.subscribe();

    let mut conn = gateway.accept().await.unwrap();
    conn.hello(QUIET_INTERVAL_MS).await.unwrap();
    conn.expect(OpCode::Identify).await.unwrap();
    conn.close(4004, "Authentication failed").await.unwrap();

    let result = timeout(TEST_TIMEOUT, handle).await.unwrap().unwrap();
    match result {
        Err(err @ GatewayError::Closed { code: 4004, .. }) => assert!(err.is_fatal()),
        other => panic!("expected fatal close, got {other:?}"),
    }
    assert_eq!(client.shard().status(), ShardStatus::Stopped);

    match wait_for(&mut events, |e| matches!(e, GatewayEvent::Disconnected { .. })).await {
        GatewayEvent::Disconnected { will_reconnect, .. } => assert!(!will_reconnect),
        _ => unreachable!(),
    }
}

// ============================================================================
// Dispatch to cache
// ============================================================================

#[tokio::test]
async fn test_dispatches_update_cache() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;
    let mut events = client.subscribe();

    let mut conn = handshake(&gateway, QUIET_INTERVAL_MS).await;
    conn.dispatch("GUILD_CREATE", 2, guild_create()).await.unwrap();
    wait_for(&mut events, |e| matches!(e, GatewayEvent::GuildAvailable { .. })).await;

    let guild = client.guild(Snowflake::new(GUILD_ID)).unwrap();
    assert_eq!(guild.name(), "Rustaceans");
    let general = client.channel(Snowflake::new(CHANNEL_ID)).unwrap();

    conn.dispatch("CHANNEL_UPDATE", 3, channel(CHANNEL_ID, "lobby"))
        .await
        .unwrap();
    match wait_for(&mut events, |e| matches!(e, GatewayEvent::ChannelUpdated { .. })).await {
        GatewayEvent::ChannelUpdated { old, .. } => {
            assert_eq!(old.unwrap().name.flatten().as_deref(), Some("general"));
        }
        _ => unreachable!(),
    }
    // A reference taken before the update sees it
    assert_eq!(general.name().as_deref(), Some("lobby"));

    conn.dispatch("MESSAGE_CREATE", 4, message(500, CHANNEL_ID, "hi"))
        .await
        .unwrap();
    wait_for(&mut events, |e| matches!(e, GatewayEvent::MessageReceived { .. })).await;
    assert!(client
        .message(Snowflake::new(CHANNEL_ID), Snowflake::new(500))
        .is_some());

    conn.dispatch("GUILD_DELETE", 5, json!({"id": GUILD_ID.to_string()}))
        .await
        .unwrap();
    wait_for(&mut events, |e| matches!(e, GatewayEvent::GuildLeft { .. })).await;
    assert!(client.guild(Snowflake::new(GUILD_ID)).is_none());
    assert!(client.channel(Snowflake::new(CHANNEL_ID)).is_none());
    assert_eq!(client.cache().stats().messages, 0);

    stop(&client, handle).await;
}

#[tokio::test]
async fn test_presence_update_is_sent() {
    let gateway = MockGateway::start().await.unwrap();
    let (client, handle) = start_client(&gateway).await;

    let mut conn = handshake(&gateway, QUIET_INTERVAL_MS).await;
    client
        .update_presence(&PresenceUpdatePayload::new("idle"))
        .await
        .unwrap();

    let presence = conn.expect(OpCode::PresenceUpdate).await.unwrap();
    assert_eq!(presence.d.unwrap()["status"], "idle");

    stop(&client, handle).await;
}
