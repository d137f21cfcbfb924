use std::collections::BTreeMap;

use appdeck_protocol::client::ClientEvent;
use appdeck_protocol::openai::chat::stream::ChatCompletionChunk;

use super::parse_tool_arguments;

#[derive(Debug, Default)]
struct ToolCallDraft {
    name: String,
    arguments: String,
}

/// Normalizer for the chat-completions stream shape. Text fragments
/// forward immediately; tool-call fragments accumulate per provider
/// index and only materialize as actions at stream end, when their
/// argument buffers are complete JSON.
#[derive(Debug, Default)]
pub struct ChatToolStream {
    tool_calls: BTreeMap<i64, ToolCallDraft>,
    explanation: String,
}

impl ChatToolStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one `data:` payload. Malformed lines yield no events.
    pub fn push_data(&mut self, data: &str) -> Vec<ClientEvent> {
        let Ok(chunk) = serde_json::from_str::<ChatCompletionChunk>(data) else {
            return Vec::new();
        };
        let Some(choice) = chunk.choices.first() else {
            return Vec::new();
        };

        let mut events = Vec::new();
        if let Some(content) = &choice.delta.content
            && !content.is_empty()
        {
            self.explanation.push_str(content);
            events.push(ClientEvent::Delta {
                data: content.clone(),
            });
        }
        for fragment in &choice.delta.tool_calls {
            let draft = self.tool_calls.entry(fragment.index).or_default();
            if !fragment.function.name.is_empty() {
                draft.name = fragment.function.name.clone();
            }
            draft.arguments.push_str(&fragment.function.arguments);
        }
        events
    }

    /// Materialize accumulated tool calls (ascending index, once each)
    /// and the terminal `Done`.
    pub fn finish(self) -> Vec<ClientEvent> {
        let mut events = Vec::with_capacity(self.tool_calls.len() + 1);
        for (_, draft) in self.tool_calls {
            events.push(ClientEvent::Action {
                action: draft.name,
                params: parse_tool_arguments(&draft.arguments),
            });
        }
        events.push(ClientEvent::Done {
            explanation: self.explanation,
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_fragment(index: i64, name: &str, arguments: &str) -> String {
        json!({
            "choices": [{
                "delta": {
                    "tool_calls": [{
                        "index": index,
                        "function": {"name": name, "arguments": arguments}
                    }]
                }
            }]
        })
        .to_string()
    }

    #[test]
    fn split_arguments_reassemble_into_one_action() {
        let mut stream = ChatToolStream::new();
        assert!(
            stream
                .push_data(&tool_fragment(0, "add_component", "{\"name\":"))
                .is_empty()
        );
        assert!(
            stream
                .push_data(&tool_fragment(0, "", "\"btn1\"}"))
                .is_empty()
        );

        let events = stream.finish();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            ClientEvent::Action {
                action: "add_component".to_string(),
                params: json!({"name": "btn1"}),
            }
        );
        assert_eq!(
            events[1],
            ClientEvent::Done {
                explanation: String::new()
            }
        );
    }

    #[test]
    fn text_deltas_forward_and_accumulate() {
        let mut stream = ChatToolStream::new();
        let first = stream
            .push_data(r#"{"choices":[{"delta":{"content":"Added "}}]}"#)
            .pop()
            .unwrap();
        assert_eq!(
            first,
            ClientEvent::Delta {
                data: "Added ".to_string()
            }
        );
        stream.push_data(r#"{"choices":[{"delta":{"content":"a button."}}]}"#);

        let events = stream.finish();
        assert_eq!(
            events,
            vec![ClientEvent::Done {
                explanation: "Added a button.".to_string()
            }]
        );
    }

    #[test]
    fn multiple_indexes_emit_in_index_order() {
        let mut stream = ChatToolStream::new();
        stream.push_data(&tool_fragment(1, "remove_component", r#"{"name":"old"}"#));
        stream.push_data(&tool_fragment(0, "add_component", r#"{"name":"new"}"#));

        let events = stream.finish();
        match (&events[0], &events[1]) {
            (
                ClientEvent::Action { action: first, .. },
                ClientEvent::Action { action: second, .. },
            ) => {
                assert_eq!(first, "add_component");
                assert_eq!(second, "remove_component");
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn broken_argument_json_degrades_to_empty_params() {
        let mut stream = ChatToolStream::new();
        stream.push_data(&tool_fragment(0, "add_component", "{\"name\": oops"));
        let events = stream.finish();
        assert_eq!(
            events[0],
            ClientEvent::Action {
                action: "add_component".to_string(),
                params: json!({}),
            }
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let mut stream = ChatToolStream::new();
        assert!(stream.push_data("not json").is_empty());
        assert!(stream.push_data(r#"{"choices":[]}"#).is_empty());
        let events = stream.finish();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ClientEvent::Done { .. }));
    }
}
