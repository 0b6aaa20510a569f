//! concierge-bridge: the host/widget action bridge protocol
//!
//! This crate defines the typed message envelopes exchanged between a host
//! page and the embedded chat widget, the action command vocabulary, and the
//! origin allow-list enforced on both ends of the channel.

pub mod channel;
pub mod command;
pub mod context;
pub mod envelope;
pub mod error;
pub mod origin;

pub use channel::{Bridge, MessagePort};
pub use command::{ActionCommand, FormField, ScrollAnchor, ScrollTarget};
pub use context::{NavLink, PageContext};
pub use envelope::{AutofillPayload, Envelope};
pub use error::{Error, Result};
pub use origin::OriginPolicy;
