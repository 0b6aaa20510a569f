//! concierge-widget: the embedded chat widget core
//!
//! Consumes the backend's streamed op events, maintains the live
//! transcript, persists history locally, and exchanges page context and
//! action commands with the host page over the bridge.

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod ops;
pub mod reducer;
pub mod sse;
pub mod store;
pub mod tags;
pub mod transcript;
pub mod widget;

pub use client::{ChatClient, ChatRequest, ChatTransport, HttpTransport, TurnEventStream};
pub use config::WidgetConfig;
pub use error::{Error, Result};
pub use message::{ChatMessage, MonotonicClock, Role};
pub use ops::{RawOp, StreamEvent, StreamOp};
pub use reducer::{Control, StreamReducer, TurnEvent, TurnState};
pub use store::ConversationStore;
pub use transcript::Transcript;
pub use widget::{ChatWidget, WidgetHandle};
