//! Defines the WebSocket message protocol between this client and the
//! document-chat server.
//!
//! All structured traffic travels as a JSON envelope `{"event": …, "data": …}`
//! on text frames. Binary frames carry raw audio bytes and are never
//! JSON-wrapped.

use base64::Engine;
use docchat_core::OutboundEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event names used on the wire, plus the distinguished router key for raw
/// binary frames.
pub mod event {
    pub const AUTH: &str = "auth";
    pub const QUESTION: &str = "question";
    pub const UPLOAD: &str = "upload";
    pub const WEBSITE: &str = "website";
    pub const STATUS: &str = "status";
    pub const ERROR: &str = "error";
    pub const ANSWER: &str = "answer";
    /// Not a wire event name: the listener-table key for binary frames.
    pub const BINARY: &str = "binary";
}

/// The decoded form of every inbound text frame. The payload is opaque at
/// this layer; only the subscribed handler interprets it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub event: String,
    pub data: Value,
}

/// Messages sent from the client to the server.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ClientEvent {
    /// Credential handshake, sent once as the first frame after open.
    Auth { token: String },
    /// A user question; `audio` requests a spoken response.
    Question { text: String, audio: bool },
    /// Context-document ingestion request. `file` is base64-encoded.
    Upload { file: String, filename: String },
    /// Context ingestion from a web address.
    Website { url: String },
}

impl From<OutboundEvent> for ClientEvent {
    /// Translates a core command into its wire form. Upload payload bytes
    /// are base64-encoded here, at the wire boundary.
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::Question { text, audio } => ClientEvent::Question { text, audio },
            OutboundEvent::Upload { filename, bytes } => ClientEvent::Upload {
                file: base64::engine::general_purpose::STANDARD.encode(&bytes),
                filename,
            },
            OutboundEvent::Website { url } => ClientEvent::Website { url },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_event_serializes_to_envelope_shape() {
        let event = ClientEvent::Question {
            text: "What is the refund policy?".to_string(),
            audio: false,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "question",
                "data": {"text": "What is the refund policy?", "audio": false}
            })
        );
    }

    #[test]
    fn test_auth_event_shape() {
        let event = ClientEvent::Auth {
            token: "secret-token-123".to_string(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "auth", "data": {"token": "secret-token-123"}})
        );
    }

    #[test]
    fn test_website_event_shape() {
        let event = ClientEvent::Website {
            url: "https://example.com/doc".to_string(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "website", "data": {"url": "https://example.com/doc"}})
        );
    }

    #[test]
    fn test_upload_conversion_base64_encodes_bytes() {
        let event = ClientEvent::from(OutboundEvent::Upload {
            filename: "notes.txt".to_string(),
            bytes: b"hello".to_vec(),
        });

        assert_eq!(
            event,
            ClientEvent::Upload {
                file: "aGVsbG8=".to_string(),
                filename: "notes.txt".to_string(),
            }
        );
    }

    #[test]
    fn test_question_conversion_preserves_audio_flag() {
        let event = ClientEvent::from(OutboundEvent::Question {
            text: "read it to me".to_string(),
            audio: true,
        });

        assert_eq!(
            event,
            ClientEvent::Question {
                text: "read it to me".to_string(),
                audio: true,
            }
        );
    }

    #[test]
    fn test_envelope_round_trip() {
        let envelope = Envelope {
            event: "answer".to_string(),
            data: json!("Refunds are processed within 14 days."),
        };

        let text = serde_json::to_string(&envelope).unwrap();
        let parsed: Envelope = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, envelope);
    }
}
