//! The streamed-response reducer state machine
//!
//! Feeds on raw transport chunks and emits [`TurnEvent`]s describing how
//! the in-progress assistant turn changes. The caller applies events to a
//! transcript and forwards requested actions; the reducer itself holds only
//! turn-local state and is fully deterministic, so chunk boundaries never
//! affect the outcome.

use concierge_bridge::ActionCommand;

use crate::ops::{self, StreamEvent, StreamOp};
use crate::sse::{self, LineBuffer};
use crate::tags;

/// Fixed message shown when the transport fails mid-turn.
pub const TRANSPORT_ERROR_TEXT: &str = "Connection interrupted.";

/// Lifecycle of one assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Streaming,
    Finalized,
    Errored,
}

/// What just happened to the in-progress turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// First byte arrived; show an empty response container
    Started,
    /// The in-progress message content changed
    ContentUpdate { content: String },
    /// Show a transient progress message (replaces any previous one)
    TransientShow { text: String },
    /// Remove all transient progress messages
    TransientClear,
    /// The typing indicator should stop (authoritative output arrived)
    TypingEnded,
    /// Forward an action to the host page
    ActionRequested(ActionCommand),
    /// Turn completed; content is final
    Finalized { content: String },
    /// Turn failed at the transport level; content is the fallback text
    Failed { content: String },
}

/// Whether the caller should keep reading the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Terminal state reached; actively cancel the reader
    Stop,
}

/// Reduces a chunked SSE stream into turn events.
#[derive(Debug, Default)]
pub struct StreamReducer {
    lines: LineBuffer,
    state: TurnState,
    content: String,
}

impl StreamReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Accumulated (tag-stripped) content of the in-progress message.
    pub fn content(&self) -> &str {
        &self.content
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, TurnState::Finalized | TurnState::Errored)
    }

    /// Feed one transport chunk. Complete lines are processed in order;
    /// a trailing partial line stays buffered for the next chunk.
    pub fn push_chunk(&mut self, chunk: &[u8], events: &mut Vec<TurnEvent>) -> Control {
        if self.is_terminal() {
            return Control::Stop;
        }
        if self.state == TurnState::Idle {
            self.state = TurnState::Streaming;
            events.push(TurnEvent::Started);
        }

        for line in self.lines.push(chunk) {
            if self.is_terminal() {
                // [DONE] already seen; later lines in the buffer are dropped
                break;
            }
            self.process_line(&line, events);
        }

        if self.is_terminal() {
            Control::Stop
        } else {
            Control::Continue
        }
    }

    /// Transport signalled end-of-stream without `[DONE]` or an error:
    /// finalize the message as-is.
    pub fn finish(&mut self, events: &mut Vec<TurnEvent>) {
        if self.is_terminal() {
            return;
        }
        if self.state == TurnState::Idle {
            self.state = TurnState::Streaming;
            events.push(TurnEvent::Started);
        }
        self.finalize(events);
    }

    /// Transport-level failure: network error or missing response body.
    pub fn fail_transport(&mut self, events: &mut Vec<TurnEvent>) {
        if self.is_terminal() {
            return;
        }
        if self.state == TurnState::Idle {
            events.push(TurnEvent::Started);
        }
        self.state = TurnState::Errored;
        self.content = TRANSPORT_ERROR_TEXT.to_string();
        events.push(TurnEvent::TransientClear);
        events.push(TurnEvent::Failed {
            content: self.content.clone(),
        });
    }

    fn finalize(&mut self, events: &mut Vec<TurnEvent>) {
        self.state = TurnState::Finalized;
        events.push(TurnEvent::TransientClear);
        events.push(TurnEvent::Finalized {
            content: self.content.clone(),
        });
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<TurnEvent>) {
        let Some(payload) = sse::data_payload(line) else {
            return;
        };
        if payload == sse::DONE_SENTINEL {
            self.finalize(events);
            return;
        }
        match StreamEvent::decode(payload) {
            Err(e) => {
                // one malformed event never aborts the turn
                tracing::warn!(error = %e, "skipping malformed stream event");
            }
            Ok(StreamEvent::Error(message)) => {
                self.content = format!("Error: {}", message);
                events.push(TurnEvent::ContentUpdate {
                    content: self.content.clone(),
                });
                self.finalize(events);
            }
            Ok(StreamEvent::Ops(ops)) => {
                for raw in ops {
                    let Some(op) = StreamOp::decode(raw) else {
                        continue;
                    };
                    self.apply_op(op, events);
                    if self.is_terminal() {
                        break;
                    }
                }
            }
        }
    }

    fn apply_op(&mut self, op: StreamOp, events: &mut Vec<TurnEvent>) {
        match op {
            StreamOp::AppendDelta(delta) => {
                events.push(TurnEvent::TransientClear);
                let clean = tags::strip_tool_spans(&delta);
                if !clean.is_empty() {
                    self.content.push_str(&clean);
                    events.push(TurnEvent::ContentUpdate {
                        content: self.content.clone(),
                    });
                }
            }
            StreamOp::FinalOutput { output, action } => {
                events.push(TurnEvent::TransientClear);
                events.push(TurnEvent::TypingEnded);
                if self.content.trim().is_empty() || tags::is_tool_markup_only(&self.content) {
                    self.content = tags::strip_generic_tags(&tags::strip_tool_spans(&output));
                    events.push(TurnEvent::ContentUpdate {
                        content: self.content.clone(),
                    });
                } else {
                    // streamed text is already good; the summary must not
                    // clobber it
                    tracing::debug!("keeping streamed content over final output");
                }
                if let Some(command) = action {
                    events.push(TurnEvent::ActionRequested(command));
                }
            }
            StreamOp::StepStart { name } => {
                events.push(TurnEvent::TransientShow {
                    text: ops::step_phrase(&name),
                });
            }
            StreamOp::StepEnd => {
                events.push(TurnEvent::TransientClear);
            }
            StreamOp::Action(command) => {
                events.push(TurnEvent::ActionRequested(command));
            }
        }
    }
}
