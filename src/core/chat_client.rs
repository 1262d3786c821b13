use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ChatReply, ChatRequest};
use crate::core::conversation::OutboundRequest;

/// Why a chat request produced no usable reply.
#[derive(Debug)]
pub enum ChatError {
    /// The request never completed (connection refused, DNS, timeout, ...).
    Transport(reqwest::Error),

    /// The endpoint answered with a non-success status.
    Status { status: u16, body: String },

    /// The body was not a `{ "response": ... }` document.
    Decode(serde_json::Error),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Transport(source) => write!(f, "request failed: {source}"),
            ChatError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "endpoint returned status {status}")
                } else {
                    write!(f, "endpoint returned status {status}: {body}")
                }
            }
            ChatError::Decode(source) => write!(f, "invalid reply body: {source}"),
        }
    }
}

impl StdError for ChatError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ChatError::Transport(source) => Some(source),
            ChatError::Status { .. } => None,
            ChatError::Decode(source) => Some(source),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(value: reqwest::Error) -> Self {
        ChatError::Transport(value)
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;
}

/// Posts chat requests to a fixed HTTP endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        debug!(
            endpoint = %self.endpoint,
            history = request.history.len(),
            "posting chat request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<ChatReply>(&body).map_err(ChatError::Decode)
    }
}

/// A finished request, tagged with the id it was issued under.
pub type ReplyEnvelope = (u64, Result<ChatReply, ChatError>);

#[derive(Clone)]
pub struct ChatService {
    transport: Arc<dyn ChatTransport>,
    tx: mpsc::UnboundedSender<ReplyEnvelope>,
}

impl ChatService {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
    ) -> (Self, mpsc::UnboundedReceiver<ReplyEnvelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { transport, tx }, rx)
    }

    /// Run one request on a background task. Nothing is delivered when the
    /// token is cancelled first.
    pub fn spawn_request(&self, request: OutboundRequest, cancel_token: CancellationToken) {
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let OutboundRequest { id, body } = request;
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    debug!(request_id = id, "chat request cancelled");
                }
                result = transport.send(&body) => {
                    let _ = tx.send((id, result));
                }
            }
        });
    }
}
