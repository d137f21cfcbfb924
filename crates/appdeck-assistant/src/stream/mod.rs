//! Normalization of the two upstream stream grammars into the single
//! client event sequence. Both normalizers consume raw SSE `data:`
//! payloads (one JSON document per line); unparsable lines are skipped
//! and never abort the stream.

mod chat;
mod document;
mod responses;

pub use chat::ChatToolStream;
pub use document::DocumentReassembly;
pub use responses::ResponsesToolStream;

use appdeck_protocol::client::ClientEvent;
use serde_json::Value as JsonValue;

/// Per-line dispatch over the two upstream grammars. Both arms feed the
/// same normalized event sequence, so the emitter stays shape-agnostic.
#[derive(Debug)]
pub enum ToolStream {
    Chat(ChatToolStream),
    Responses(ResponsesToolStream),
}

impl ToolStream {
    pub fn for_chat() -> Self {
        Self::Chat(ChatToolStream::new())
    }

    pub fn for_responses() -> Self {
        Self::Responses(ResponsesToolStream::new())
    }

    pub fn push_data(&mut self, data: &str) -> Vec<ClientEvent> {
        match self {
            Self::Chat(state) => state.push_data(data),
            Self::Responses(state) => state.push_data(data),
        }
    }

    pub fn finish(self) -> Vec<ClientEvent> {
        match self {
            Self::Chat(state) => state.finish(),
            Self::Responses(state) => state.finish(),
        }
    }
}

/// Tool arguments accumulate as raw text and parse only once complete; a
/// model that emitted broken JSON still yields an action, with empty
/// params, rather than killing the stream.
pub(crate) fn parse_tool_arguments(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::Object(serde_json::Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arguments_parse_or_default_to_empty_object() {
        assert_eq!(
            parse_tool_arguments(r#"{"name":"btn1"}"#),
            json!({"name": "btn1"})
        );
        assert_eq!(parse_tool_arguments("{\"name\":"), json!({}));
        assert_eq!(parse_tool_arguments(""), json!({}));
    }
}
