//! Publishes the host page's context to the widget on load

use concierge_bridge::{Bridge, Envelope, MessagePort};

use crate::dom::DomAccessor;
use crate::error::Result;

/// Sends `page_info` to the widget once its frame has loaded.
pub struct PageInfoPublisher<'a, P: MessagePort> {
    bridge: &'a Bridge<P>,
}

impl<'a, P: MessagePort> PageInfoPublisher<'a, P> {
    pub fn new(bridge: &'a Bridge<P>) -> Self {
        Self { bridge }
    }

    /// Called when the widget iframe finishes loading.
    pub fn on_frame_load<D: DomAccessor>(&self, dom: &D) -> Result<()> {
        let context = dom.page_context()?;
        tracing::debug!(url = %context.url, "publishing page info");
        self.bridge.send(&Envelope::PageInfo(context))?;
        Ok(())
    }
}
