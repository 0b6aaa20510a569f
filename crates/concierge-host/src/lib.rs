//! concierge-host: host-page side of the concierge widget
//!
//! Runs inside the embedding document: resolves and executes action
//! commands sent by the widget, publishes page context when the widget
//! frame loads, and scans site navigation. All DOM access goes through the
//! [`dom::DomAccessor`] capability trait.

pub mod dom;
pub mod error;
pub mod executor;
pub mod publisher;
pub mod resolve;
pub mod runtime;
pub mod scanner;

#[cfg(test)]
pub(crate) mod testing;

pub use dom::{DomAccessor, DomEvent, NodeId, ScrollBehavior};
pub use error::{Error, Result};
pub use executor::{ActionExecutor, ActionOutcome, FieldOutcome};
pub use publisher::PageInfoPublisher;
pub use runtime::HostRuntime;
pub use scanner::scan_site_navigation;
