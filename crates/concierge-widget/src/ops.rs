//! Decoding streamed event payloads into closed op variants
//!
//! The wire addresses ops by slash paths. Paths are interpreted once, here;
//! the rest of the reducer matches on [`StreamOp`] and unknown paths fall
//! into one explicit ignored case instead of scattered substring checks.

use serde::Deserialize;

use concierge_bridge::ActionCommand;

use crate::error::{Error, Result};

/// One raw instruction unit as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOp {
    pub path: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Raw payload shape of one decoded SSE event.
#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    ops: Option<Vec<RawOp>>,
    #[serde(default)]
    error: Option<String>,
}

/// One decoded SSE event: a batch of ops or a backend-reported error.
#[derive(Debug)]
pub enum StreamEvent {
    Ops(Vec<RawOp>),
    Error(String),
}

impl StreamEvent {
    /// Decode a `data:` payload. Payloads matching neither shape are
    /// rejected so malformed events are skipped explicitly, not half-read.
    pub fn decode(payload: &str) -> Result<StreamEvent> {
        let event: EventPayload = serde_json::from_str(payload)?;
        if let Some(ops) = event.ops {
            return Ok(StreamEvent::Ops(ops));
        }
        if let Some(error) = event.error {
            return Ok(StreamEvent::Error(error));
        }
        Err(Error::UnrecognizedEvent(payload.to_string()))
    }
}

/// `final_output` op value.
#[derive(Debug, Deserialize)]
struct FinalOutputValue {
    output: String,
    #[serde(default)]
    action: Option<ActionCommand>,
}

/// `steps/.../start` op value.
#[derive(Debug, Deserialize)]
struct StepStartValue {
    name: String,
}

/// A stream instruction, decoded from its path pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOp {
    /// Append a delta to the in-progress assistant message
    AppendDelta(String),
    /// Authoritative final text, optionally carrying an action
    FinalOutput {
        output: String,
        action: Option<ActionCommand>,
    },
    /// An intermediate agent step began
    StepStart { name: String },
    /// An intermediate agent step ended
    StepEnd,
    /// An action for the host page; never touches message content
    Action(ActionCommand),
}

impl StreamOp {
    /// Interpret a raw op by its path. Unknown paths and malformed values
    /// return `None` (logged); the protocol is forward-compatible.
    pub fn decode(raw: RawOp) -> Option<StreamOp> {
        let path = raw.path.as_str();

        // Step sub-paths first: their streamed_output entries only clear
        // progress indicators, they never feed message content.
        if path.contains("/steps/") {
            if path.ends_with("/start") {
                return match serde_json::from_value::<StepStartValue>(raw.value) {
                    Ok(value) => Some(StreamOp::StepStart { name: value.name }),
                    Err(e) => {
                        tracing::warn!(path, error = %e, "bad step start value");
                        None
                    }
                };
            }
            if path.ends_with("/end") || path.ends_with("/streamed_output/-") {
                return Some(StreamOp::StepEnd);
            }
            tracing::debug!(path, "ignoring unknown step op");
            return None;
        }

        if path.ends_with("/streamed_output/-") {
            return match raw.value {
                serde_json::Value::String(delta) => Some(StreamOp::AppendDelta(delta)),
                other => {
                    tracing::warn!(path, value = %other, "non-string streamed output");
                    None
                }
            };
        }

        if path.ends_with("/final_output") {
            return match serde_json::from_value::<FinalOutputValue>(raw.value) {
                Ok(value) => Some(StreamOp::FinalOutput {
                    output: value.output,
                    action: value.action,
                }),
                Err(e) => {
                    tracing::warn!(path, error = %e, "bad final output value");
                    None
                }
            };
        }

        if path.ends_with("/actions/-") {
            return match serde_json::from_value::<ActionCommand>(raw.value) {
                Ok(command) => Some(StreamOp::Action(command)),
                Err(e) => {
                    tracing::warn!(path, error = %e, "bad action value");
                    None
                }
            };
        }

        tracing::debug!(path, "ignoring unknown op path");
        None
    }
}

/// Human phrase for a step's wire name, shown as a transient progress
/// message.
pub fn step_phrase(name: &str) -> String {
    match name {
        "Tool:DuckDuckGoSearchRun" => "AI is searching the web…".to_string(),
        "Tool:scrape_webpage" => "AI is analyzing the page…".to_string(),
        "LLM:ChatGroq" => "AI is thinking…".to_string(),
        other => format!("AI is performing step: {}…", other),
    }
}
