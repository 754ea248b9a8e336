//! Gateway message envelope

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    HelloPayload, IdentifyPayload, OpCode, PresenceUpdatePayload, RequestGuildMembersPayload,
    ResumePayload, VoiceStateUpdatePayload,
};

/// Gateway message format
///
/// Every frame in either direction uses this envelope. `d` is always
/// serialized (as `null` when empty); `s` and `t` only accompany dispatches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event data payload
    #[serde(default)]
    pub d: Option<Value>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event name (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayMessage {
    fn with_data(op: OpCode, data: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op,
            d: Some(serde_json::to_value(data)?),
            s: None,
            t: None,
        })
    }

    fn bare(op: OpCode) -> Self {
        Self {
            op,
            d: None,
            s: None,
            t: None,
        }
    }

    // === Client Messages ===

    /// Heartbeat (op=1) carrying the last sequence received
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            d: last_sequence.map(|s| Value::Number(s.into())),
            ..Self::bare(OpCode::Heartbeat)
        }
    }

    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Self::with_data(OpCode::Identify, payload)
    }

    pub fn resume(payload: &ResumePayload) -> Result<Self, serde_json::Error> {
        Self::with_data(OpCode::Resume, payload)
    }

    pub fn presence_update(payload: &PresenceUpdatePayload) -> Result<Self, serde_json::Error> {
        Self::with_data(OpCode::PresenceUpdate, payload)
    }

    pub fn voice_state_update(
        payload: &VoiceStateUpdatePayload,
    ) -> Result<Self, serde_json::Error> {
        Self::with_data(OpCode::VoiceStateUpdate, payload)
    }

    pub fn request_guild_members(
        payload: &RequestGuildMembersPayload,
    ) -> Result<Self, serde_json::Error> {
        Self::with_data(OpCode::RequestGuildMembers, payload)
    }

    // === Server Messages ===

    /// Dispatch (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            d: Some(data),
            s: Some(sequence),
            t: Some(event_type.into()),
        }
    }

    /// Hello (op=10)
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self {
            d: Some(serde_json::json!({ "heartbeat_interval": payload.heartbeat_interval })),
            ..Self::bare(OpCode::Hello)
        }
    }

    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck)
    }

    #[must_use]
    pub fn reconnect() -> Self {
        Self::bare(OpCode::Reconnect)
    }

    /// Invalid Session (op=9); `resumable` tells the client whether to resume
    #[must_use]
    pub fn invalid_session(resumable: bool) -> Self {
        Self {
            d: Some(Value::Bool(resumable)),
            ..Self::bare(OpCode::InvalidSession)
        }
    }

    // === Parsing ===

    fn data_as<T: DeserializeOwned>(&self, op: OpCode) -> Option<T> {
        if self.op != op {
            return None;
        }
        self.d
            .as_ref()
            .and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    pub fn as_hello(&self) -> Option<HelloPayload> {
        self.data_as(OpCode::Hello)
    }

    pub fn as_identify(&self) -> Option<IdentifyPayload> {
        self.data_as(OpCode::Identify)
    }

    pub fn as_resume(&self) -> Option<ResumePayload> {
        self.data_as(OpCode::Resume)
    }

    /// Whether an Invalid Session message allows resuming
    pub fn as_invalid_session(&self) -> Option<bool> {
        if self.op != OpCode::InvalidSession {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_bool).unwrap_or(false))
    }

    /// Sequence number carried by a heartbeat (op=1)
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_u64))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{IdentifyProperties, Intents};

    #[test]
    fn test_parse_platform_dispatch() {
        let msg = GatewayMessage::from_json(
            r#"{"op": 0, "d": {"id": "1"}, "s": 42, "t": "MESSAGE_CREATE"}"#,
        )
        .unwrap();

        assert_eq!(msg.op, OpCode::Dispatch);
        assert_eq!(msg.t.as_deref(), Some("MESSAGE_CREATE"));
        assert_eq!(msg.s, Some(42));
    }

    #[test]
    fn test_parse_null_fields() {
        let msg =
            GatewayMessage::from_json(r#"{"op": 11, "d": null, "s": null, "t": null}"#).unwrap();
        assert_eq!(msg.op, OpCode::HeartbeatAck);
        assert!(msg.d.is_none());
        assert!(msg.s.is_none());
    }

    #[test]
    fn test_hello() {
        let msg = GatewayMessage::from_json(r#"{"op": 10, "d": {"heartbeat_interval": 45000}}"#)
            .unwrap();
        assert_eq!(msg.as_hello().unwrap().heartbeat_interval, 45_000);
        assert!(GatewayMessage::heartbeat_ack().as_hello().is_none());
    }

    #[test]
    fn test_heartbeat_serializes_null_sequence() {
        let json = GatewayMessage::heartbeat(None).to_json().unwrap();
        assert_eq!(json, r#"{"op":1,"d":null}"#);

        let json = GatewayMessage::heartbeat(Some(41)).to_json().unwrap();
        assert_eq!(json, r#"{"op":1,"d":41}"#);
    }

    #[test]
    fn test_invalid_session() {
        assert_eq!(GatewayMessage::invalid_session(true).as_invalid_session(), Some(true));
        assert_eq!(GatewayMessage::invalid_session(false).as_invalid_session(), Some(false));
        assert_eq!(GatewayMessage::reconnect().as_invalid_session(), None);
    }

    #[test]
    fn test_identify_roundtrip_through_envelope() {
        let payload = IdentifyPayload {
            token: "abc".to_string(),
            properties: IdentifyProperties::library(),
            intents: Intents::GUILDS | Intents::GUILD_MESSAGES,
            shard: None,
            large_threshold: None,
            presence: None,
        };
        let msg = GatewayMessage::identify(&payload).unwrap();
        let parsed = GatewayMessage::from_json(&msg.to_json().unwrap()).unwrap();

        let identify = parsed.as_identify().unwrap();
        assert_eq!(identify.token, "abc");
        assert_eq!(identify.intents, Intents::GUILDS | Intents::GUILD_MESSAGES);
    }

    #[test]
    fn test_message_display() {
        let dispatch = GatewayMessage::dispatch("MESSAGE_CREATE", 5, serde_json::json!({}));
        let display = format!("{dispatch}");
        assert!(display.contains("MESSAGE_CREATE"));
        assert!(display.contains("s=5"));

        assert!(format!("{}", GatewayMessage::heartbeat_ack()).contains("HeartbeatAck"));
    }
}
