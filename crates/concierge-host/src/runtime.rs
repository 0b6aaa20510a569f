//! Host-side wiring: bridge receive loop feeding the executor

use concierge_bridge::{Bridge, Envelope, MessagePort};

use crate::dom::DomAccessor;
use crate::error::Result;
use crate::executor::{ActionExecutor, ActionOutcome};
use crate::publisher::PageInfoPublisher;

/// Everything the embed script runs inside the host document: publishes
/// page info when the widget frame loads and executes commands the widget
/// sends back.
pub struct HostRuntime<D: DomAccessor, P: MessagePort> {
    executor: ActionExecutor<D>,
    bridge: Bridge<P>,
}

impl<D: DomAccessor, P: MessagePort> HostRuntime<D, P> {
    pub fn new(dom: D, bridge: Bridge<P>) -> Self {
        Self {
            executor: ActionExecutor::new(dom),
            bridge,
        }
    }

    /// Widget iframe finished loading; send it the current page context.
    pub fn on_frame_load(&self) -> Result<()> {
        PageInfoPublisher::new(&self.bridge).on_frame_load(self.executor.dom())
    }

    /// Handle one raw message from the widget window.
    ///
    /// Disallowed origins, unrecognized envelope types, and non-action
    /// envelopes all return `Ok(None)`; executed commands return their
    /// outcome.
    pub fn on_message(&mut self, raw: &str, source_origin: &str) -> Result<Option<ActionOutcome>> {
        let Some(envelope) = self.bridge.receive(raw, source_origin)? else {
            return Ok(None);
        };
        match envelope {
            Envelope::PageInfo(_) => {
                // host originates page_info; an echo is noise
                tracing::debug!("ignoring page_info sent to host");
                Ok(None)
            }
            other => {
                let Some(command) = other.into_action() else {
                    return Ok(None);
                };
                let outcome = self.executor.execute(&command);
                if outcome.success {
                    tracing::debug!(kind = command.kind(), "action executed");
                } else {
                    tracing::warn!(kind = command.kind(), message = %outcome.message, "action failed");
                }
                Ok(Some(outcome))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDom;
    use concierge_bridge::{MessagePort, OriginPolicy, Result as BridgeResult};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct RecordingPort {
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingPort {
        fn new() -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl MessagePort for RecordingPort {
        fn post(&self, _target_origin: &str, raw: &str) -> BridgeResult<()> {
            self.sent.lock().unwrap().push(raw.to_string());
            Ok(())
        }
    }

    fn runtime(dom: FakeDom) -> (HostRuntime<FakeDom, RecordingPort>, RecordingPort) {
        let port = RecordingPort::new();
        let policy = OriginPolicy::allow_list(["https://widget.example"]).unwrap();
        let bridge = Bridge::new(port.clone(), "https://widget.example", policy);
        (HostRuntime::new(dom, bridge), port)
    }

    #[test]
    fn test_frame_load_publishes_page_info() {
        let (runtime, port) = runtime(FakeDom::new("https://example.com/pricing"));
        runtime.on_frame_load().unwrap();
        let sent = port.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains(r#""type":"page_info""#));
        assert!(sent[0].contains("https://example.com/pricing"));
    }

    #[test]
    fn test_action_message_is_executed() {
        let mut dom = FakeDom::new("https://example.com/");
        dom.add_input(Some("#name"), None, None, None);
        let (mut runtime, _port) = runtime(dom);
        let raw = r##"{"type":"action","payload":{"type":"fill","selector":"#name","value":"Ada"}}"##;
        let outcome = runtime
            .on_message(raw, "https://widget.example")
            .unwrap()
            .unwrap();
        assert!(outcome.success);
    }

    #[test]
    fn test_legacy_autofill_message_is_executed() {
        let mut dom = FakeDom::new("https://example.com/");
        dom.add_input(Some("#email"), None, None, None);
        let (mut runtime, _port) = runtime(dom);
        let raw = r##"{"type":"autofill","payload":{"fields":[{"selector":"#email","value":"a@b.c"}]}}"##;
        let outcome = runtime
            .on_message(raw, "https://widget.example")
            .unwrap()
            .unwrap();
        assert!(outcome.success);
    }

    #[test]
    fn test_message_from_disallowed_origin_is_dropped() {
        let (mut runtime, _port) = runtime(FakeDom::new("https://example.com/"));
        let raw = r#"{"type":"action","payload":{"type":"navigate","url":"https://evil.example"}}"#;
        let outcome = runtime.on_message(raw, "https://evil.example").unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_unknown_envelope_type_is_ignored() {
        let (mut runtime, _port) = runtime(FakeDom::new("https://example.com/"));
        let outcome = runtime
            .on_message(r#"{"type":"ping","payload":{}}"#, "https://widget.example")
            .unwrap();
        assert!(outcome.is_none());
    }
}
