//! Gateway shard
//!
//! One persistent WebSocket connection: Hello, then Identify or Resume,
//! heartbeats with zombie detection, dispatches fed through the cache
//! updater, and reconnects with exponential backoff until a fatal close
//! code or shutdown.

mod backoff;
mod heartbeat;
mod session;

pub use backoff::Backoff;
pub use heartbeat::Heartbeat;
pub use session::SessionState;

use std::num::NonZeroU32;
use std::time::Duration;

use cord_common::{GatewayConfig, Token};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use governor::{DefaultDirectRateLimiter, Quota};
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{sleep, sleep_until, timeout, Instant};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::cache_updater::CacheUpdater;
use crate::error::{GatewayError, GatewayResult};
use crate::events::GatewayEvent;
use crate::protocol::{
    CloseCode, GatewayMessage, IdentifyPayload, IdentifyProperties, Intents, OpCode,
    PresenceUpdatePayload, RequestGuildMembersPayload,
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SocketSink = SplitSink<Socket, Message>;
type SocketStream = SplitStream<Socket>;

/// Outgoing command buffer
const COMMAND_BUFFER_SIZE: usize = 32;

/// Gateway send limit per connection
const COMMANDS_PER_MINUTE: u32 = 120;

// ============================================================================
// Options
// ============================================================================

/// Connection settings for one shard
#[derive(Debug, Clone)]
pub struct ShardOptions {
    /// Gateway base URL, without query
    pub url: String,
    pub version: u8,
    pub shard_id: u32,
    pub shard_count: u32,
    pub intents: Intents,
    pub properties: IdentifyProperties,
    pub large_threshold: Option<u8>,
    pub presence: Option<PresenceUpdatePayload>,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    /// How long to wait for Hello after connecting
    pub hello_timeout: Duration,
    /// Outgoing payloads allowed per minute; 0 disables the limit
    pub commands_per_minute: u32,
}

impl ShardOptions {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            url: config.url.clone(),
            version: config.version,
            shard_id: config.shard_id,
            shard_count: config.shard_count.max(1),
            intents: Intents::from_bits_truncate(config.intents),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_max = max;
        self
    }

    /// Query-qualified URL for a gateway base
    pub fn gateway_url(&self, base: &str) -> String {
        format!(
            "{}/?v={}&encoding=json",
            base.trim_end_matches('/'),
            self.version
        )
    }
}

impl Default for ShardOptions {
    fn default() -> Self {
        let config = GatewayConfig::default();
        Self {
            url: config.url,
            version: config.version,
            shard_id: 0,
            shard_count: 1,
            intents: Intents::from_bits_truncate(config.intents),
            properties: IdentifyProperties::library(),
            large_threshold: None,
            presence: None,
            backoff_base: Duration::from_secs(1),
            backoff_max: Duration::from_secs(60),
            hello_timeout: Duration::from_secs(20),
            commands_per_minute: COMMANDS_PER_MINUTE,
        }
    }
}

// ============================================================================
// Status
// ============================================================================

/// Connection lifecycle of a shard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardStatus {
    Disconnected,
    Connecting,
    Identifying,
    Resuming,
    Connected,
    Stopped,
}

impl ShardStatus {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Identifying => "identifying",
            Self::Resuming => "resuming",
            Self::Connected => "connected",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for ShardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a single connection ended without an error
enum Disconnect {
    Shutdown,
    Reconnect,
    /// Op 9; the next handshake waits [`invalid_session_delay`] instead of the backoff
    InvalidSession,
}

/// Random 1-5 s pause required before identifying after an invalid session
fn invalid_session_delay() -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(1_000..=5_000))
}

/// One decoded WebSocket frame
enum Frame {
    Payload(GatewayMessage),
    Closed { code: Option<u16>, reason: String },
}

// ============================================================================
// Shard
// ============================================================================

pub struct Shard {
    options: ShardOptions,
    token: Token,
    updater: CacheUpdater,
    events: broadcast::Sender<GatewayEvent>,
    session: Mutex<SessionState>,
    status: RwLock<ShardStatus>,
    latency: RwLock<Option<Duration>>,
    commands_tx: mpsc::Sender<GatewayMessage>,
    commands_rx: tokio::sync::Mutex<mpsc::Receiver<GatewayMessage>>,
    shutdown: watch::Sender<bool>,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl Shard {
    pub fn new(
        options: ShardOptions,
        token: Token,
        updater: CacheUpdater,
        events: broadcast::Sender<GatewayEvent>,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER_SIZE);
        let (shutdown, _) = watch::channel(false);
        let limiter = NonZeroU32::new(options.commands_per_minute)
            .map(|rate| governor::RateLimiter::direct(Quota::per_minute(rate)));

        Self {
            options,
            token,
            updater,
            events,
            session: Mutex::new(SessionState::new()),
            status: RwLock::new(ShardStatus::Disconnected),
            latency: RwLock::new(None),
            commands_tx,
            commands_rx: tokio::sync::Mutex::new(commands_rx),
            shutdown,
            limiter,
        }
    }

    pub fn id(&self) -> u32 {
        self.options.shard_id
    }

    pub fn options(&self) -> &ShardOptions {
        &self.options
    }

    pub fn status(&self) -> ShardStatus {
        *self.status.read()
    }

    pub fn session(&self) -> SessionState {
        self.session.lock().clone()
    }

    /// Round trip of the last acknowledged heartbeat
    pub fn latency(&self) -> Option<Duration> {
        *self.latency.read()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.events.subscribe()
    }

    /// Queue a payload for the connection
    pub async fn send(&self, message: GatewayMessage) -> GatewayResult<()> {
        self.commands_tx
            .send(message)
            .await
            .map_err(|_| GatewayError::Shutdown)
    }

    /// Op 3
    pub async fn update_presence(&self, presence: &PresenceUpdatePayload) -> GatewayResult<()> {
        if !presence.is_valid_status() {
            return Err(GatewayError::protocol(format!(
                "invalid presence status '{}'",
                presence.status
            )));
        }
        self.send(GatewayMessage::presence_update(presence)?).await
    }

    /// Op 8; members arrive as `GUILD_MEMBERS_CHUNK` dispatches
    pub async fn request_guild_members(
        &self,
        request: &RequestGuildMembersPayload,
    ) -> GatewayResult<()> {
        self.send(GatewayMessage::request_guild_members(request)?).await
    }

    /// Ask the run loop to close the connection and return
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub(crate) fn identify_payload(&self) -> IdentifyPayload {
        IdentifyPayload {
            token: self.token.secret().to_string(),
            properties: self.options.properties.clone(),
            intents: self.options.intents,
            shard: Some([self.options.shard_id, self.options.shard_count]),
            large_threshold: self.options.large_threshold,
            presence: self.options.presence.clone(),
        }
    }

    /// Resume URL when resuming, the configured URL otherwise
    pub(crate) fn connect_url(&self) -> String {
        let resume_url = {
            let session = self.session.lock();
            if session.is_resumable() {
                session.resume_url().map(str::to_string)
            } else {
                None
            }
        };
        self.options
            .gateway_url(resume_url.as_deref().unwrap_or(&self.options.url))
    }

    fn set_status(&self, status: ShardStatus) {
        let previous = std::mem::replace(&mut *self.status.write(), status);
        if previous != status {
            tracing::debug!(shard_id = self.id(), from = %previous, to = %status, "Shard status changed");
        }
    }

    fn publish(&self, event: GatewayEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!(shard_id = self.id(), "No event subscribers");
        }
    }

    // ========================================================================
    // Run loop
    // ========================================================================

    /// Connect and keep the connection alive
    ///
    /// Returns `Ok` after [`Shard::shutdown`], or the error that stopped the
    /// shard (a fatal close code such as 4004).
    pub async fn run(&self) -> GatewayResult<()> {
        let mut commands = self
            .commands_rx
            .try_lock()
            .map_err(|_| GatewayError::protocol("shard is already running"))?;
        let mut shutdown = self.shutdown.subscribe();
        let mut backoff = Backoff::new(self.options.backoff_base, self.options.backoff_max);

        tracing::info!(
            shard_id = self.id(),
            shard_count = self.options.shard_count,
            intents = self.options.intents.bits(),
            "Starting shard"
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }
            self.set_status(ShardStatus::Connecting);

            let outcome = self.serve(&mut commands, &mut shutdown, &mut backoff).await;
            self.set_status(ShardStatus::Disconnected);

            let code = match &outcome {
                Err(GatewayError::Closed { code, .. }) => Some(*code),
                _ => None,
            };
            let invalidated = matches!(outcome, Ok(Disconnect::InvalidSession));

            match outcome {
                Ok(Disconnect::Shutdown) => break,
                Ok(Disconnect::Reconnect | Disconnect::InvalidSession) => {
                    tracing::info!(shard_id = self.id(), "Reconnecting");
                }
                Err(err) if err.is_fatal() => {
                    tracing::error!(shard_id = self.id(), error = %err, "Shard stopped by fatal error");
                    self.set_status(ShardStatus::Stopped);
                    self.publish(GatewayEvent::Disconnected {
                        shard_id: self.id(),
                        code,
                        will_reconnect: false,
                    });
                    return Err(err);
                }
                Err(err) => {
                    if err.close_code().is_some_and(CloseCode::invalidates_session) {
                        self.session.lock().reset();
                    }
                    tracing::warn!(shard_id = self.id(), error = %err, "Connection lost");
                }
            }

            self.publish(GatewayEvent::Disconnected {
                shard_id: self.id(),
                code,
                will_reconnect: true,
            });

            let delay = if invalidated {
                invalid_session_delay()
            } else {
                backoff.next_delay()
            };
            tracing::debug!(
                shard_id = self.id(),
                attempt = backoff.attempt(),
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Waiting before reconnect"
            );
            tokio::select! {
                () = sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        self.set_status(ShardStatus::Stopped);
        self.publish(GatewayEvent::Disconnected {
            shard_id: self.id(),
            code: None,
            will_reconnect: false,
        });
        tracing::info!(shard_id = self.id(), "Shard stopped");
        Ok(())
    }

    /// Drive one connection until it ends
    async fn serve(
        &self,
        commands: &mut mpsc::Receiver<GatewayMessage>,
        shutdown: &mut watch::Receiver<bool>,
        backoff: &mut Backoff,
    ) -> GatewayResult<Disconnect> {
        let url = self.connect_url();
        tracing::info!(shard_id = self.id(), url = %url, "Connecting to gateway");

        let (socket, _) = connect_async(url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let hello = match timeout(self.options.hello_timeout, next_frame(&mut stream)).await {
            Ok(frame) => frame?,
            Err(_) => return Err(GatewayError::protocol("timed out waiting for Hello")),
        };
        let hello = match hello {
            Frame::Payload(message) if message.op == OpCode::Hello => message
                .as_hello()
                .ok_or_else(|| GatewayError::protocol("malformed Hello payload"))?,
            Frame::Payload(message) => {
                return Err(GatewayError::protocol(format!(
                    "expected Hello, received {}",
                    message.op
                )))
            }
            Frame::Closed { code, reason } => return Err(self.closed(code, reason)),
        };

        tracing::debug!(
            shard_id = self.id(),
            heartbeat_interval = hello.heartbeat_interval,
            "Received Hello"
        );
        let mut heartbeat =
            Heartbeat::new(Duration::from_millis(hello.heartbeat_interval), Instant::now());

        self.handshake(&mut sink).await?;

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    let frame = CloseFrame {
                        code: WsCloseCode::Normal,
                        reason: "shutdown".into(),
                    };
                    if let Err(err) = sink.send(Message::Close(Some(frame))).await {
                        tracing::debug!(shard_id = self.id(), error = %err, "Close frame not sent");
                    }
                    return Ok(Disconnect::Shutdown);
                }
                () = sleep_until(heartbeat.next_beat()) => {
                    if heartbeat.is_zombie() {
                        tracing::warn!(shard_id = self.id(), "Heartbeat ACK missing, dropping connection");
                        return Err(GatewayError::ZombieConnection);
                    }
                    self.send_heartbeat(&mut sink, &mut heartbeat).await?;
                }
                Some(command) = commands.recv() => {
                    self.send_payload(&mut sink, &command).await?;
                }
                frame = next_frame(&mut stream) => {
                    match frame? {
                        Frame::Payload(message) => {
                            if let Some(end) = self
                                .handle_payload(message, &mut sink, &mut heartbeat, backoff)
                                .await?
                            {
                                return Ok(end);
                            }
                        }
                        Frame::Closed { code, reason } => return Err(self.closed(code, reason)),
                    }
                }
            }
        }
    }

    /// Resume when the session allows it, identify otherwise
    async fn handshake(&self, sink: &mut SocketSink) -> GatewayResult<()> {
        let resume = self.session.lock().resume_payload(self.token.secret());
        let message = match resume {
            Some(payload) => {
                self.set_status(ShardStatus::Resuming);
                tracing::info!(
                    shard_id = self.id(),
                    session_id = %payload.session_id,
                    seq = payload.seq,
                    "Resuming session"
                );
                GatewayMessage::resume(&payload)?
            }
            None => {
                self.set_status(ShardStatus::Identifying);
                tracing::info!(shard_id = self.id(), "Identifying");
                GatewayMessage::identify(&self.identify_payload())?
            }
        };
        self.send_payload(sink, &message).await
    }

    async fn handle_payload(
        &self,
        message: GatewayMessage,
        sink: &mut SocketSink,
        heartbeat: &mut Heartbeat,
        backoff: &mut Backoff,
    ) -> GatewayResult<Option<Disconnect>> {
        match message.op {
            OpCode::Dispatch => self.handle_dispatch(message, backoff),
            OpCode::Heartbeat => self.send_heartbeat(sink, heartbeat).await?,
            OpCode::HeartbeatAck => {
                heartbeat.record_ack(Instant::now());
                *self.latency.write() = heartbeat.latency();
                tracing::trace!(shard_id = self.id(), latency = ?heartbeat.latency(), "Heartbeat acknowledged");
            }
            OpCode::Reconnect => {
                tracing::info!(shard_id = self.id(), "Gateway requested reconnect");
                return Ok(Some(Disconnect::Reconnect));
            }
            OpCode::InvalidSession => {
                let resumable = message.as_invalid_session().unwrap_or(false);
                tracing::warn!(shard_id = self.id(), resumable, "Session invalidated");
                if !resumable {
                    self.session.lock().reset();
                }
                return Ok(Some(Disconnect::InvalidSession));
            }
            other => {
                tracing::debug!(shard_id = self.id(), op = %other, "Ignoring unexpected opcode");
            }
        }
        Ok(None)
    }

    fn handle_dispatch(&self, message: GatewayMessage, backoff: &mut Backoff) {
        if let Some(seq) = message.s {
            self.session.lock().record_sequence(seq);
        }
        let Some(name) = message.t else {
            tracing::warn!(shard_id = self.id(), "Dispatch without event name");
            return;
        };
        let data = message.d.unwrap_or(Value::Null);

        let resume_url = (name == "READY")
            .then(|| data.get("resume_gateway_url").and_then(Value::as_str))
            .flatten()
            .map(str::to_string);

        match self.updater.apply(&name, data) {
            Ok(event) => {
                match &event {
                    GatewayEvent::Ready { session_id, .. } => {
                        self.session.lock().start(session_id.clone(), resume_url);
                        self.set_status(ShardStatus::Connected);
                        backoff.reset();
                    }
                    GatewayEvent::Resumed => {
                        tracing::info!(shard_id = self.id(), "Session resumed");
                        self.set_status(ShardStatus::Connected);
                        backoff.reset();
                    }
                    _ => {}
                }
                self.publish(event);
            }
            Err(err) => {
                tracing::warn!(shard_id = self.id(), event = %name, error = %err, "Failed to apply dispatch");
            }
        }
    }

    async fn send_heartbeat(&self, sink: &mut SocketSink, heartbeat: &mut Heartbeat) -> GatewayResult<()> {
        let seq = self.session.lock().sequence();
        self.send_payload(sink, &GatewayMessage::heartbeat(seq)).await?;
        heartbeat.record_sent(Instant::now());
        Ok(())
    }

    async fn send_payload(&self, sink: &mut SocketSink, message: &GatewayMessage) -> GatewayResult<()> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        let json = message.to_json()?;
        tracing::trace!(shard_id = self.id(), op = %message.op, "Sending payload");
        sink.send(Message::Text(json)).await?;
        Ok(())
    }

    fn closed(&self, code: Option<u16>, reason: String) -> GatewayError {
        match code {
            Some(code) => {
                let known = CloseCode::from_u16(code);
                tracing::warn!(
                    shard_id = self.id(),
                    code,
                    name = known.map_or("unknown", CloseCode::name),
                    reason = %reason,
                    "Gateway closed connection"
                );
                GatewayError::Closed { code, reason }
            }
            None => GatewayError::protocol("connection closed without a close frame"),
        }
    }
}

impl std::fmt::Debug for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shard")
            .field("id", &self.id())
            .field("status", &self.status())
            .field("session", &*self.session.lock())
            .finish_non_exhaustive()
    }
}

/// Next text or binary payload, skipping control frames
async fn next_frame(stream: &mut SocketStream) -> GatewayResult<Frame> {
    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(text) => return Ok(Frame::Payload(GatewayMessage::from_json(&text)?)),
            Message::Binary(bytes) => return Ok(Frame::Payload(serde_json::from_slice(&bytes)?)),
            Message::Close(frame) => {
                return Ok(match frame {
                    Some(frame) => Frame::Closed {
                        code: Some(u16::from(frame.code)),
                        reason: frame.reason.into_owned(),
                    },
                    None => Frame::Closed {
                        code: None,
                        reason: String::new(),
                    },
                })
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }
    Ok(Frame::Closed {
        code: None,
        reason: "stream ended".to_string(),
    })
}
