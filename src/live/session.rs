use std::collections::VecDeque;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::sockjs::{self, SockJsFrame};
use super::stomp::{self, Frame};
use super::{LiveError, LiveSource};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub(crate) struct StompSession {
    socket: Socket,
    pending: VecDeque<Frame>,
    next_subscription: u32,
}

impl StompSession {
    /// Opens the SockJS WebSocket and completes the STOMP CONNECT handshake.
    pub(crate) async fn connect(url: &Url) -> Result<Self, LiveError> {
        let (socket, _response) = connect_async(url.as_str()).await?;
        let mut session = Self { socket, pending: VecDeque::new(), next_subscription: 0 };

        session.await_open().await?;

        let host = url.host_str().unwrap_or("localhost").to_string();
        session.send(&Frame::connect(&host)).await?;

        match session.next_frame().await? {
            Some(frame) if frame.command == "CONNECTED" => {
                tracing::debug!(version = frame.get("version").unwrap_or("1.0"), "STOMP connected");
                Ok(session)
            }
            Some(frame) if frame.command == "ERROR" => Err(broker_error(&frame)),
            Some(frame) => {
                Err(LiveError::Protocol(format!("expected CONNECTED, got {}", frame.command)))
            }
            None => Err(LiveError::Closed("CONNECTED")),
        }
    }

    pub(crate) async fn subscribe(&mut self, destination: &str) -> Result<String, LiveError> {
        let id = format!("sub-{}", self.next_subscription);
        self.next_subscription += 1;
        self.send(&Frame::subscribe(&id, destination)).await?;
        Ok(id)
    }

    pub(crate) async fn disconnect(&mut self) {
        if let Err(err) = self.send(&Frame::disconnect()).await {
            tracing::debug!(error = %err, "Failed to send DISCONNECT");
        }
        if let Err(err) = self.socket.close(None).await {
            tracing::debug!(error = %err, "Failed to close websocket");
        }
    }

    async fn send(&mut self, frame: &Frame) -> Result<(), LiveError> {
        let payload = sockjs::encode(&[frame.encode()])?;
        self.socket.send(Message::Text(payload)).await?;
        Ok(())
    }

    async fn await_open(&mut self) -> Result<(), LiveError> {
        loop {
            match self.read_sockjs().await? {
                Some(SockJsFrame::Open) => return Ok(()),
                Some(SockJsFrame::Heartbeat) => continue,
                Some(SockJsFrame::Close { code, reason }) => {
                    return Err(LiveError::Protocol(format!(
                        "sockjs session refused ({code}): {reason}"
                    )));
                }
                Some(SockJsFrame::Messages(_)) => {
                    return Err(LiveError::Protocol("messages before sockjs open".to_string()));
                }
                None => return Err(LiveError::Closed("sockjs open frame")),
            }
        }
    }

    async fn read_sockjs(&mut self) -> Result<Option<SockJsFrame>, LiveError> {
        loop {
            let Some(message) = self.socket.next().await else {
                return Ok(None);
            };
            match message? {
                Message::Text(text) => return sockjs::decode(&text).map(Some),
                Message::Close(_) => return Ok(None),
                _ => continue,
            }
        }
    }

    /// Next STOMP frame, or `None` once the transport closes.
    pub(crate) async fn next_frame(&mut self) -> Result<Option<Frame>, LiveError> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(Some(frame));
            }
            match self.read_sockjs().await? {
                None => return Ok(None),
                Some(SockJsFrame::Open | SockJsFrame::Heartbeat) => continue,
                Some(SockJsFrame::Messages(messages)) => {
                    for message in messages {
                        self.pending.extend(stomp::decode_all(&message)?);
                    }
                }
                Some(SockJsFrame::Close { code, reason }) => {
                    tracing::info!(code, reason = %reason, "SockJS session closed by server");
                    return Ok(None);
                }
            }
        }
    }
}

fn broker_error(frame: &Frame) -> LiveError {
    let message = frame.get("message").unwrap_or(frame.body.as_str());
    LiveError::Broker(message.to_string())
}

/// One subscription on its own session.
pub(crate) struct TopicSubscription {
    session: StompSession,
    subscription_id: String,
}

impl TopicSubscription {
    pub(crate) fn new(session: StompSession, subscription_id: String) -> Self {
        Self { session, subscription_id }
    }

}

#[async_trait]
impl LiveSource for TopicSubscription {
    async fn next_body(&mut self) -> Result<Option<String>, LiveError> {
        loop {
            let Some(frame) = self.session.next_frame().await? else {
                return Ok(None);
            };
            match frame.command.as_str() {
                "MESSAGE" => {
                    let matches = frame
                        .get("subscription")
                        .map_or(true, |subscription| subscription == self.subscription_id);
                    if matches {
                        return Ok(Some(frame.body));
                    }
                }
                "ERROR" => return Err(broker_error(&frame)),
                other => tracing::debug!(command = other, "Ignoring STOMP frame"),
            }
        }
    }

    async fn close(&mut self) {
        tracing::debug!(subscription_id = %self.subscription_id, "Disconnecting STOMP session");
        self.session.disconnect().await;
    }
}
