//! Push channel used by the instructor dashboard: STOMP over a SockJS
//! WebSocket session.

mod session;
pub(crate) mod sockjs;
pub(crate) mod stomp;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::core::config::Settings;
pub(crate) use session::{StompSession, TopicSubscription};

#[derive(Debug, Error)]
pub(crate) enum LiveError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("broker error: {0}")]
    Broker(String),
    #[error("connection closed while waiting for {0}")]
    Closed(&'static str),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

/// A subscribed topic. Yields raw message bodies in arrival order.
#[async_trait]
pub(crate) trait LiveSource: Send {
    /// `Ok(None)` once the channel has closed; there is no reconnect.
    async fn next_body(&mut self) -> Result<Option<String>, LiveError>;

    /// Leaves the topic. Errors are logged, not returned.
    async fn close(&mut self) {}
}

#[async_trait]
pub(crate) trait LiveConnector: Send + Sync {
    async fn subscribe(&self, destination: &str) -> Result<Box<dyn LiveSource>, LiveError>;
}

/// Opens a fresh STOMP session per subscription against the SockJS endpoint.
#[derive(Debug, Clone)]
pub(crate) struct StompConnector {
    endpoint: Url,
}

impl StompConnector {
    pub(crate) fn new(base_url: &Url, ws_path: &str) -> Self {
        let mut endpoint = base_url.clone();
        let path = format!("{}{}", base_url.path().trim_end_matches('/'), ws_path);
        endpoint.set_path(&path);
        Self { endpoint }
    }

    pub(crate) fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.base_url(), settings.ws_path())
    }

    pub(crate) fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LiveConnector for StompConnector {
    async fn subscribe(&self, destination: &str) -> Result<Box<dyn LiveSource>, LiveError> {
        let url = sockjs::transport_url(&self.endpoint)?;
        tracing::debug!(url = %url, destination, "Opening STOMP session");

        let mut session = StompSession::connect(&url).await?;
        let subscription_id = session.subscribe(destination).await?;
        tracing::info!(destination, subscription_id = %subscription_id, "Subscribed to topic");

        Ok(Box::new(TopicSubscription::new(session, subscription_id)))
    }
}
