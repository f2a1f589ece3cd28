//! The frame encode/decode contract shared by the send and receive paths.
//!
//! Structured events are serialized to JSON text frames; audio payloads
//! pass through as binary frames untouched. Decoding exactly inverts
//! encoding for the JSON path, and a malformed text frame is logged and
//! dropped without affecting the connection.

use super::protocol::{ClientEvent, Envelope};
use bytes::Bytes;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{trace, warn};

/// A frame to transmit.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    Event(ClientEvent),
    Audio(Bytes),
}

/// A frame received from the transport, after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Event(Envelope),
    Binary(Bytes),
}

/// Encodes an outbound frame into a transport message.
pub fn encode(frame: OutboundFrame) -> Result<Message, serde_json::Error> {
    match frame {
        OutboundFrame::Event(event) => {
            let serialized = serde_json::to_string(&event)?;
            Ok(Message::Text(serialized.into()))
        }
        // Binary traffic is never JSON-wrapped.
        OutboundFrame::Audio(payload) => Ok(Message::Binary(payload)),
    }
}

/// Decodes a transport message into an inbound frame.
///
/// Returns `None` for control frames and for text frames that do not parse
/// as an envelope; neither closes the connection.
pub fn decode(message: Message) -> Option<InboundFrame> {
    match message {
        Message::Text(text) => match serde_json::from_str::<Envelope>(text.as_str()) {
            Ok(envelope) => Some(InboundFrame::Event(envelope)),
            Err(e) => {
                warn!(error = %e, frame = %text, "Dropping malformed text frame");
                None
            }
        },
        Message::Binary(payload) => Some(InboundFrame::Binary(payload)),
        other => {
            trace!(?other, "Ignoring control frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_decode_round_trips_json_events() {
        let cases = vec![
            (
                ClientEvent::Auth {
                    token: "secret".to_string(),
                },
                "auth",
                json!({"token": "secret"}),
            ),
            (
                ClientEvent::Question {
                    text: "What is the refund policy?".to_string(),
                    audio: false,
                },
                "question",
                json!({"text": "What is the refund policy?", "audio": false}),
            ),
            (
                ClientEvent::Upload {
                    file: "aGVsbG8=".to_string(),
                    filename: "notes.txt".to_string(),
                },
                "upload",
                json!({"file": "aGVsbG8=", "filename": "notes.txt"}),
            ),
            (
                ClientEvent::Website {
                    url: "https://example.com/doc".to_string(),
                },
                "website",
                json!({"url": "https://example.com/doc"}),
            ),
        ];

        for (event, name, data) in cases {
            let message = encode(OutboundFrame::Event(event)).unwrap();
            match decode(message) {
                Some(InboundFrame::Event(envelope)) => {
                    assert_eq!(envelope.event, name);
                    assert_eq!(envelope.data, data);
                }
                other => panic!("Expected an envelope for '{}', got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_binary_payload_is_byte_identical() {
        let payload = Bytes::from_static(&[0x49, 0x44, 0x33, 0x00, 0xff]);

        let message = encode(OutboundFrame::Audio(payload.clone())).unwrap();
        assert!(matches!(message, Message::Binary(_)));

        match decode(message) {
            Some(InboundFrame::Binary(decoded)) => assert_eq!(decoded, payload),
            other => panic!("Expected binary frame, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_text_frame_is_dropped() {
        assert_eq!(decode(Message::Text("not json".into())), None);
        assert_eq!(decode(Message::Text("{}".into())), None);
        assert_eq!(decode(Message::Text(r#"{"event": "answer"}"#.into())), None);
    }

    #[test]
    fn test_control_frames_are_ignored() {
        assert_eq!(decode(Message::Ping(Bytes::new())), None);
        assert_eq!(decode(Message::Pong(Bytes::new())), None);
    }

    #[test]
    fn test_decode_accepts_any_payload_shape() {
        let message = Message::Text(r#"{"event": "status", "data": {"step": 2}}"#.into());

        match decode(message) {
            Some(InboundFrame::Event(envelope)) => {
                assert_eq!(envelope.event, "status");
                assert_eq!(envelope.data, json!({"step": 2}));
            }
            other => panic!("Expected envelope, got {:?}", other),
        }
    }
}
