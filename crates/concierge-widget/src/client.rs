//! Streaming chat client for the `/api/chat` endpoint

use std::pin::Pin;

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;

use concierge_bridge::NavLink;

use crate::error::{Error, Result};
use crate::message::ChatMessage;
use crate::reducer::{Control, StreamReducer, TurnEvent};

/// Path appended to the widget's base URL.
pub const CHAT_ENDPOINT: &str = "/api/chat";

/// Request body for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    /// Committed history, without transient or in-progress entries
    pub history: Vec<ChatMessage>,
    pub current_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_navigation: Option<Vec<NavLink>>,
}

/// Raw response body as a chunk stream.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>> + Send>>;

/// Transport capability so the client is testable without a network.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// POST the request and return the chunked response body.
    async fn open(&self, base_url: &str, request: &ChatRequest) -> Result<ByteStream>;
}

/// Production transport over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn open(&self, base_url: &str, request: &ChatRequest) -> Result<ByteStream> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), CHAT_ENDPOINT);
        tracing::debug!(%url, "opening chat stream");
        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(status.as_u16()));
        }
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(Error::from));
        Ok(Box::pin(stream))
    }
}

/// A stream of turn events for one submission.
pub type TurnEventStream = Pin<Box<dyn Stream<Item = TurnEvent> + Send>>;

/// Drives the reducer over a transport. Never retries; every failure mode
/// surfaces as turn events so the UI always leaves the loading state.
pub struct ChatClient<T: ChatTransport> {
    transport: T,
    base_url: String,
}

enum ReadStep {
    Chunk(Vec<u8>),
    TransportError(Error),
    Done,
    Cancelled,
}

impl<T: ChatTransport> ChatClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one turn, yielding events as the response streams in.
    ///
    /// The reader is actively cancelled once the reducer reports a terminal
    /// state; buffered data past `[DONE]` is never processed.
    pub async fn stream_turn(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> TurnEventStream {
        let opened = self.transport.open(&self.base_url, &request).await;

        Box::pin(stream! {
            let mut reducer = StreamReducer::new();

            let mut byte_stream = match opened {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::error!(error = %e, "failed to open chat stream");
                    let mut events = Vec::new();
                    reducer.fail_transport(&mut events);
                    for event in events {
                        yield event;
                    }
                    return;
                }
            };

            loop {
                let step = tokio::select! {
                    _ = cancel.cancelled() => ReadStep::Cancelled,
                    chunk = byte_stream.next() => match chunk {
                        Some(Ok(bytes)) => ReadStep::Chunk(bytes),
                        Some(Err(e)) => ReadStep::TransportError(e),
                        None => ReadStep::Done,
                    },
                };

                let mut events = Vec::new();
                match step {
                    ReadStep::Chunk(bytes) => {
                        let control = reducer.push_chunk(&bytes, &mut events);
                        for event in events {
                            yield event;
                        }
                        if control == Control::Stop {
                            // terminal state: stop reading; dropping the
                            // stream below closes the connection
                            break;
                        }
                    }
                    ReadStep::TransportError(e) => {
                        tracing::error!(error = %e, "chat stream failed");
                        reducer.fail_transport(&mut events);
                        for event in events {
                            yield event;
                        }
                        break;
                    }
                    ReadStep::Done => {
                        reducer.finish(&mut events);
                        for event in events {
                            yield event;
                        }
                        break;
                    }
                    ReadStep::Cancelled => {
                        tracing::debug!("turn cancelled");
                        reducer.finish(&mut events);
                        for event in events {
                            yield event;
                        }
                        break;
                    }
                }
            }

            drop(byte_stream);
        })
    }
}
