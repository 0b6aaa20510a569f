//! The widget facade: transcript, store, client, and bridge wired together

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use concierge_bridge::{Bridge, Envelope, MessagePort, NavLink, PageContext};

use crate::client::{ChatClient, ChatRequest, ChatTransport};
use crate::config::WidgetConfig;
use crate::error::{Error, Result};
use crate::message::ChatMessage;
use crate::reducer::TurnEvent;
use crate::store::ConversationStore;
use crate::transcript::Transcript;

/// Assistant message shown after a purge.
const PURGE_MESSAGE: &str = "Memory purged. Ready for new instructions.";

/// Cloneable handle for aborting a turn and serializing submissions.
///
/// All fields are `Arc`-wrapped, so cloning is cheap.
#[derive(Clone)]
pub struct WidgetHandle {
    cancel: Arc<Mutex<CancellationToken>>,
    in_flight: Arc<AtomicBool>,
}

impl WidgetHandle {
    fn new() -> Self {
        Self {
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Abort the in-flight turn; the reply finalizes with what it has.
    pub fn abort(&self) {
        self.cancel.lock().cancel();
    }

    /// Whether a turn is currently streaming.
    pub fn is_streaming(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the single turn slot; submissions are serialized.
    fn begin_turn(&self) -> Result<CancellationToken> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::TurnInFlight);
        }
        let token = CancellationToken::new();
        *self.cancel.lock() = token.clone();
        Ok(token)
    }

    fn finish_turn(&self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// The embedded chat widget core: owns the transcript and conversation
/// store, talks to the backend through a [`ChatClient`], and exchanges
/// page context and actions with the host page over the bridge.
pub struct ChatWidget<T: ChatTransport, P: MessagePort> {
    transcript: Transcript,
    store: ConversationStore,
    client: ChatClient<T>,
    bridge: Bridge<P>,
    page_context: Option<PageContext>,
    site_navigation: Option<Vec<NavLink>>,
    handle: WidgetHandle,
}

impl<T: ChatTransport, P: MessagePort> ChatWidget<T, P> {
    /// Build a widget from loaded history. An empty conversation gets the
    /// configured greeting, persisted like any other message.
    pub fn new(
        config: &WidgetConfig,
        client: ChatClient<T>,
        bridge: Bridge<P>,
        store: ConversationStore,
        history: Vec<ChatMessage>,
    ) -> Result<Self> {
        let mut widget = Self {
            transcript: Transcript::from_history(history),
            store,
            client,
            bridge,
            page_context: None,
            site_navigation: None,
            handle: WidgetHandle::new(),
        };
        if widget.transcript.is_empty() {
            widget.greet(config.greeting())?;
        }
        Ok(widget)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn handle(&self) -> WidgetHandle {
        self.handle.clone()
    }

    pub fn page_context(&self) -> Option<&PageContext> {
        self.page_context.as_ref()
    }

    /// Provide scanned navigation links to send with future requests.
    pub fn set_site_navigation(&mut self, links: Vec<NavLink>) {
        self.site_navigation = Some(links);
    }

    /// Handle one raw message from the host window. `page_info` updates the
    /// cached context; everything else is not for the widget and is dropped.
    pub fn on_message(&mut self, raw: &str, source_origin: &str) -> Result<()> {
        match self.bridge.receive(raw, source_origin)? {
            Some(Envelope::PageInfo(context)) => {
                tracing::debug!(url = %context.url, "received page info");
                self.page_context = Some(context);
            }
            Some(_) => {
                tracing::debug!("ignoring non-page_info envelope on widget side");
            }
            None => {}
        }
        Ok(())
    }

    /// Submit a user message and stream the reply to completion.
    ///
    /// Rejected with [`Error::TurnInFlight`] while an earlier turn is still
    /// streaming.
    pub async fn submit(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let cancel = self.handle.begin_turn()?;
        let result = self.run_turn(text, cancel).await;
        self.handle.finish_turn();
        result
    }

    async fn run_turn(&mut self, text: &str, cancel: CancellationToken) -> Result<()> {
        // history captured before the new user message; the message field
        // carries it
        let history = self.transcript.history_for_request();
        let user = self.transcript.push_user(text);
        self.store.save(&user)?;

        let request = ChatRequest {
            message: text.to_string(),
            history,
            current_url: self.page_context.as_ref().map(|c| c.url.clone()),
            site_navigation: self.site_navigation.clone(),
        };

        let mut turn = self.client.stream_turn(request, cancel).await;
        while let Some(event) = turn.next().await {
            self.transcript.apply(&event);
            if let TurnEvent::ActionRequested(command) = &event {
                if let Err(e) = self.bridge.send(&Envelope::Action(command.clone())) {
                    tracing::warn!(error = %e, "failed to forward action to host");
                }
            }
        }

        let completed = self
            .transcript
            .last_completed_assistant()
            .filter(|m| m.timestamp > user.timestamp)
            .cloned();
        if let Some(message) = completed {
            self.store.save(&message)?;
        }
        Ok(())
    }

    /// Purge the conversation and start fresh.
    pub fn purge(&mut self) -> Result<()> {
        if self.handle.is_streaming() {
            return Err(Error::TurnInFlight);
        }
        self.store.clear()?;
        self.transcript.clear();
        self.greet(PURGE_MESSAGE)
    }

    fn greet(&mut self, text: &str) -> Result<()> {
        let message = self.transcript.push_assistant(text);
        self.store.save(&message)?;
        Ok(())
    }
}
