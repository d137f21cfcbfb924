use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Normalized assistant event delivered to the editor client. Exactly one
/// `Done` or `Error` terminates a stream; `Error` replaces `Done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Delta { data: String },
    Action { action: String, params: JsonValue },
    Done { explanation: String },
    Error { data: String },
}

impl ClientEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClientEvent::Done { .. } | ClientEvent::Error { .. })
    }
}

pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Encode one event as an SSE frame. Events serialize infallibly (plain
/// strings and already-built JSON values), so a failure here would be a
/// serializer bug; it degrades to an empty frame rather than panicking.
pub fn encode_client_event(event: &ClientEvent) -> Bytes {
    match serde_json::to_string(event) {
        Ok(json) => Bytes::from(format!("data: {json}\n\n")),
        Err(_) => Bytes::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delta_wire_shape() {
        let frame = encode_client_event(&ClientEvent::Delta {
            data: "Hel".to_string(),
        });
        assert_eq!(&frame[..], b"data: {\"type\":\"delta\",\"data\":\"Hel\"}\n\n");
    }

    #[test]
    fn action_wire_shape() {
        let event = ClientEvent::Action {
            action: "add_component".to_string(),
            params: json!({"name": "btn1"}),
        };
        let frame = encode_client_event(&event);
        let text = std::str::from_utf8(&frame).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(text.trim_start_matches("data: ").trim()).unwrap();
        assert_eq!(
            value,
            json!({"type": "action", "action": "add_component", "params": {"name": "btn1"}})
        );
    }

    #[test]
    fn done_and_error_are_terminal() {
        assert!(
            ClientEvent::Done {
                explanation: String::new()
            }
            .is_terminal()
        );
        assert!(
            ClientEvent::Error {
                data: "boom".to_string()
            }
            .is_terminal()
        );
        assert!(
            !ClientEvent::Delta {
                data: "x".to_string()
            }
            .is_terminal()
        );
    }
}
