//! Message envelopes exchanged between host page and widget

use serde::{Deserialize, Serialize};

use crate::command::{ActionCommand, FormField};
use crate::context::PageContext;
use crate::error::Result;

/// Payload of the legacy `autofill` envelope kept for older backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutofillPayload {
    pub fields: Vec<FormField>,
}

/// The `{ type, payload }` envelope carried over the cross-document channel.
///
/// Host to widget: `page_info`. Widget to host: `action` and the legacy
/// `autofill`. Receivers ignore unrecognized types instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Envelope {
    /// Current URL/domain of the host page
    PageInfo(PageContext),
    /// An action command for the host to execute
    Action(ActionCommand),
    /// Legacy bulk form fill
    Autofill(AutofillPayload),
}

/// Shape probe used to skip unrecognized envelope types.
#[derive(Deserialize)]
struct Probe {
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl Envelope {
    /// Encode for the wire.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a raw message.
    ///
    /// Returns `Ok(None)` when the message is not an envelope or carries an
    /// unrecognized `type` — the receiver contract is to ignore those. A
    /// recognized type with a malformed payload is an error.
    pub fn decode(raw: &str) -> Result<Option<Envelope>> {
        let probe: Probe = match serde_json::from_str(raw) {
            Ok(probe) => probe,
            Err(_) => {
                tracing::debug!("ignoring non-envelope message");
                return Ok(None);
            }
        };
        match probe.kind.as_deref() {
            Some("page_info") | Some("action") | Some("autofill") => {
                Ok(Some(serde_json::from_str(raw)?))
            }
            Some(other) => {
                tracing::debug!(kind = other, "ignoring unrecognized envelope type");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Normalize to the action the host should execute, if any.
    ///
    /// Legacy `autofill` envelopes map onto `fill_form` so the executor has
    /// a single entry point.
    pub fn into_action(self) -> Option<ActionCommand> {
        match self {
            Envelope::Action(cmd) => Some(cmd),
            Envelope::Autofill(payload) => Some(ActionCommand::FillForm {
                fields: payload.fields,
            }),
            Envelope::PageInfo(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_roundtrip() {
        let envelope = Envelope::PageInfo(PageContext {
            url: "https://example.com/pricing".into(),
            domain: "example.com".into(),
        });
        let wire = envelope.encode().unwrap();
        assert!(wire.contains(r#""type":"page_info""#));
        let decoded = Envelope::decode(&wire).unwrap().unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_action_envelope_decodes() {
        let wire = r##"{"type":"action","payload":{"type":"fill","selector":"#name","value":"Ada"}}"##;
        let decoded = Envelope::decode(wire).unwrap().unwrap();
        assert_eq!(
            decoded.into_action(),
            Some(ActionCommand::Fill {
                selector: "#name".into(),
                value: "Ada".into(),
            })
        );
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let decoded = Envelope::decode(r#"{"type":"telemetry","payload":{}}"#).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_non_envelope_is_ignored() {
        assert!(Envelope::decode(r#"{"hello":"world"}"#).unwrap().is_none());
        assert!(Envelope::decode("42").unwrap().is_none());
    }

    #[test]
    fn test_known_type_with_bad_payload_is_an_error() {
        assert!(Envelope::decode(r#"{"type":"page_info","payload":{"url":7}}"#).is_err());
    }

    #[test]
    fn test_legacy_autofill_maps_to_fill_form() {
        let wire = r##"{"type":"autofill","payload":{"fields":[{"selector":"#name","value":"Ada"}]}}"##;
        let decoded = Envelope::decode(wire).unwrap().unwrap();
        match decoded.into_action() {
            Some(ActionCommand::FillForm { fields }) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].selector, "#name");
            }
            other => panic!("expected fill_form, got {:?}", other),
        }
    }
}
