//! The bidirectional bridge over a raw cross-document port

use crate::envelope::Envelope;
use crate::error::Result;
use crate::origin::OriginPolicy;

/// Capability trait over the raw window-to-window message channel.
///
/// Delivery is fire-and-forget: no acknowledgement, FIFO ordering on a
/// single port only.
pub trait MessagePort: Send + Sync {
    /// Post an encoded envelope to the peer at `target_origin`.
    fn post(&self, target_origin: &str, raw: &str) -> Result<()>;
}

/// One end of the host/widget bridge: a port, a peer origin, and the
/// origin policy enforced on both send and receive.
pub struct Bridge<P: MessagePort> {
    port: P,
    peer_origin: String,
    policy: OriginPolicy,
}

impl<P: MessagePort> Bridge<P> {
    pub fn new(port: P, peer_origin: impl Into<String>, policy: OriginPolicy) -> Self {
        Self {
            port,
            peer_origin: peer_origin.into(),
            policy,
        }
    }

    /// Send an envelope to the peer. Refuses targets outside the policy.
    pub fn send(&self, envelope: &Envelope) -> Result<()> {
        self.policy.check(&self.peer_origin)?;
        let raw = envelope.encode()?;
        self.port.post(&self.peer_origin, &raw)
    }

    /// Handle one inbound raw message.
    ///
    /// Messages from origins outside the policy are dropped, as are
    /// unrecognized envelope types; both return `Ok(None)`.
    pub fn receive(&self, raw: &str, source_origin: &str) -> Result<Option<Envelope>> {
        if !self.policy.allows(source_origin) {
            tracing::warn!(origin = source_origin, "dropping message from disallowed origin");
            return Ok(None);
        }
        Envelope::decode(raw)
    }
}
