//! Payload fixtures

use serde_json::{json, Value};

pub const BOT_ID: u64 = 99;
pub const GUILD_ID: u64 = 10;
pub const CHANNEL_ID: u64 = 20;

pub fn user(id: u64, username: &str) -> Value {
    json!({"id": id.to_string(), "username": username, "discriminator": "0"})
}

pub fn ready(session_id: &str, guild_ids: &[u64]) -> Value {
    let guilds: Vec<Value> = guild_ids
        .iter()
        .map(|id| json!({"id": id.to_string(), "unavailable": true}))
        .collect();
    json!({
        "v": 10,
        "user": {"id": BOT_ID.to_string(), "username": "cord-bot", "bot": true},
        "guilds": guilds,
        "session_id": session_id,
        "shard": [0, 1]
    })
}

pub fn guild_create() -> Value {
    json!({
        "id": GUILD_ID.to_string(),
        "name": "Rustaceans",
        "owner_id": "1",
        "roles": [
            {"id": GUILD_ID.to_string(), "name": "@everyone", "permissions": "104324673", "position": 0}
        ],
        "members": [
            {"user": user(1, "alice"), "roles": [], "joined_at": "2024-01-01T00:00:00Z"}
        ],
        "channels": [
            {"id": CHANNEL_ID.to_string(), "type": 0, "name": "general", "position": 0}
        ]
    })
}

pub fn channel(id: u64, name: &str) -> Value {
    json!({
        "id": id.to_string(),
        "type": 0,
        "guild_id": GUILD_ID.to_string(),
        "name": name,
        "position": 0
    })
}

pub fn message(id: u64, channel_id: u64, content: &str) -> Value {
    json!({
        "id": id.to_string(),
        "channel_id": channel_id.to_string(),
        "author": user(1, "alice"),
        "content": content,
        "timestamp": "2024-01-01T00:00:00Z"
    })
}

/// Messages with ids `from` down to `from - count + 1`, newest first
pub fn message_page(channel_id: u64, from: u64, count: u64) -> Value {
    Value::Array(
        (0..count)
            .map(|offset| message(from - offset, channel_id, "page"))
            .collect(),
    )
}

pub fn group_dm(id: u64, name: Option<&str>) -> Value {
    json!({
        "id": id.to_string(),
        "type": 3,
        "name": name,
        "owner_id": "1",
        "recipients": [user(1, "alice"), user(2, "bob")]
    })
}
