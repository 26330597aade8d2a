//! Real-time frame channel.
//!
//! Client sends `image` frames (raw data URL text, or `{"event":"image","data":...}`);
//! server answers each processed frame with `{"event":"result","data":<outcome>}`.
//! One frame is processed per connection at a time and frames arriving
//! meanwhile are dropped.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::task::{JoinError, JoinHandle};
use tracing::Instrument;

use crate::frame::encoded_len_limit;
use crate::gesture::GestureOutcome;
use crate::pipeline::PipelineError;
use crate::response::AppError;
use crate::state::{AppState, ConnectionSlot};

const IMAGE_EVENT: &str = "image";

#[derive(Debug, Deserialize)]
struct ClientEnvelope {
    event: String,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocketError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ServerMessage {
    Result(GestureOutcome),
    Error(SocketError),
}

impl ServerMessage {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ServerMessage::Error(SocketError {
            code: code.to_string(),
            message: message.into(),
        })
    }
}

impl From<Result<GestureOutcome, PipelineError>> for ServerMessage {
    fn from(value: Result<GestureOutcome, PipelineError>) -> Self {
        match value {
            Ok(outcome) => ServerMessage::Result(outcome),
            Err(e) => ServerMessage::error(e.code(), e.to_string()),
        }
    }
}

/// What the connection loop should do with one client message.
#[derive(Debug, PartialEq)]
pub enum Inbound {
    Frame(String),
    Reply(ServerMessage),
    Ignore,
    Close,
}

pub fn parse_client_message(msg: Message) -> Inbound {
    match msg {
        Message::Text(text) => parse_text(text),
        Message::Binary(_) => Inbound::Reply(ServerMessage::error(
            "UNSUPPORTED_MESSAGE",
            "binary frames are not supported; send a data url as text",
        )),
        Message::Ping(_) | Message::Pong(_) => Inbound::Ignore,
        Message::Close(_) => Inbound::Close,
    }
}

fn parse_text(text: String) -> Inbound {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('{') {
        return Inbound::Frame(text);
    }

    match serde_json::from_str::<ClientEnvelope>(trimmed) {
        Ok(envelope) if envelope.event == IMAGE_EVENT => Inbound::Frame(envelope.data),
        Ok(envelope) => Inbound::Reply(ServerMessage::error(
            "UNKNOWN_EVENT",
            format!("unknown event '{}'", envelope.event),
        )),
        Err(e) => Inbound::Reply(ServerMessage::error("INVALID_MESSAGE", e.to_string())),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(socket_handler))
}

pub async fn socket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let slot = state
        .try_acquire_socket()
        .ok_or_else(|| AppError::too_many_requests("Too many socket connections"))?;

    let max_message =
        encoded_len_limit(state.config().limits.max_frame_bytes).saturating_add(1024);
    let span = tracing::info_span!("socket", connection_id = %uuid::Uuid::new_v4());
    Ok(ws
        .max_message_size(max_message)
        .on_upgrade(move |socket| serve_socket(socket, state, slot).instrument(span)))
}

async fn serve_socket(socket: WebSocket, state: AppState, _slot: ConnectionSlot) {
    tracing::info!(connections = state.socket_connections(), "Client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut shutdown_rx = state.shutdown_rx();
    let mut in_flight: Option<JoinHandle<ServerMessage>> = None;

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let msg = match incoming {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "Socket receive failed");
                        break;
                    }
                    None => break,
                };

                match parse_client_message(msg) {
                    Inbound::Frame(data) => {
                        if in_flight.is_some() {
                            state.pipeline().record_dropped();
                            tracing::debug!("Frame dropped, previous frame still processing");
                            continue;
                        }
                        let pipeline = state.pipeline().clone();
                        in_flight = Some(tokio::spawn(async move {
                            ServerMessage::from(pipeline.process(&data).await)
                        }));
                    }
                    Inbound::Reply(reply) => {
                        if send_message(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                    Inbound::Ignore => {}
                    Inbound::Close => break,
                }
            }
            finished = join_in_flight(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                let reply = match finished {
                    Ok(reply) => reply,
                    Err(e) => {
                        tracing::error!(error = %e, "Frame task failed");
                        ServerMessage::error("INTERNAL_ERROR", "服务器内部错误")
                    }
                };
                if send_message(&mut sender, &reply).await.is_err() {
                    break;
                }
            }
            _ = shutdown_rx.recv() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }

    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
    tracing::info!("Client disconnected");
}

async fn join_in_flight(
    slot: &mut Option<JoinHandle<ServerMessage>>,
) -> Result<ServerMessage, JoinError> {
    match slot {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

async fn send_message<S>(sender: &mut S, msg: &ServerMessage) -> Result<(), ()>
where
    S: futures::Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize socket message");
            return Ok(());
        }
    };
    sender.send(Message::Text(json)).await.map_err(|e| {
        tracing::debug!(error = %e, "Socket send failed");
    })
}
