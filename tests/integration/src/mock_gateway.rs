//! Gateway mock: the test plays the server side of each connection

use std::borrow::Cow;
use std::net::SocketAddr;

use anyhow::{anyhow, bail, Result};
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use cord_gateway::protocol::HelloPayload;
use cord_gateway::{GatewayMessage, OpCode};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::TEST_TIMEOUT;

async fn upgrade(
    State(accepted): State<mpsc::UnboundedSender<GatewayConnection>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        accepted.send(GatewayConnection { socket }).ok();
    })
}

/// WebSocket endpoint bound to an ephemeral port
pub struct MockGateway {
    pub addr: SocketAddr,
    accepted: Mutex<mpsc::UnboundedReceiver<GatewayConnection>>,
    _handle: JoinHandle<()>,
}

impl MockGateway {
    pub async fn start() -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new().route("/", get(upgrade)).with_state(tx);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            accepted: Mutex::new(rx),
            _handle: handle,
        })
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Wait for the next client connection
    pub async fn accept(&self) -> Result<GatewayConnection> {
        let mut accepted = self.accepted.lock().await;
        timeout(TEST_TIMEOUT, accepted.recv())
            .await
            .map_err(|_| anyhow!("no gateway connection within {TEST_TIMEOUT:?}"))?
            .ok_or_else(|| anyhow!("gateway mock stopped"))
    }
}

/// Server side of one gateway connection
pub struct GatewayConnection {
    socket: WebSocket,
}

impl GatewayConnection {
    pub async fn send(&mut self, message: &GatewayMessage) -> Result<()> {
        self.socket.send(Message::Text(message.to_json()?)).await?;
        Ok(())
    }

    pub async fn hello(&mut self, heartbeat_interval_ms: u64) -> Result<()> {
        self.send(&GatewayMessage::hello(HelloPayload::with_interval(
            heartbeat_interval_ms,
        )))
        .await
    }

    pub async fn dispatch(&mut self, name: &str, seq: u64, data: Value) -> Result<()> {
        self.send(&GatewayMessage::dispatch(name, seq, data)).await
    }

    /// Next payload from the client
    pub async fn recv(&mut self) -> Result<GatewayMessage> {
        loop {
            let frame = timeout(TEST_TIMEOUT, self.socket.recv())
                .await
                .map_err(|_| anyhow!("no payload within {TEST_TIMEOUT:?}"))?
                .ok_or_else(|| anyhow!("client disconnected"))??;
            match frame {
                Message::Text(text) => return Ok(GatewayMessage::from_json(&text)?),
                Message::Binary(bytes) => return Ok(serde_json::from_slice(&bytes)?),
                Message::Close(frame) => {
                    bail!("client closed: {:?}", frame.map(|frame| frame.code))
                }
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    }

    /// Next payload with `op`, skipping heartbeats unless they are asked for
    pub async fn expect(&mut self, op: OpCode) -> Result<GatewayMessage> {
        loop {
            let message = self.recv().await?;
            if message.op == op {
                return Ok(message);
            }
            if message.op != OpCode::Heartbeat {
                bail!("expected {op}, received {}", message.op);
            }
        }
    }

    pub async fn close(mut self, code: u16, reason: &'static str) -> Result<()> {
        self.socket
            .send(Message::Close(Some(CloseFrame {
                code,
                reason: Cow::Borrowed(reason),
            })))
            .await?;
        Ok(())
    }
}
