use appdeck_protocol::client::ClientEvent;
use appdeck_protocol::openai::responses::stream::{
    ContentPart, OutputItem, ResponseStreamEvent,
};

use super::parse_tool_arguments;

/// Normalizer for the responses-API stream shape. Function calls arrive
/// whole inside `output_item.done`, so actions emit immediately; a
/// completed message item carries text that was already streamed as
/// deltas, so it only folds into the explanation and is not re-emitted.
#[derive(Debug, Default)]
pub struct ResponsesToolStream {
    explanation: String,
}

impl ResponsesToolStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one `data:` payload. Malformed lines yield no events.
    pub fn push_data(&mut self, data: &str) -> Vec<ClientEvent> {
        let Ok(event) = serde_json::from_str::<ResponseStreamEvent>(data) else {
            return Vec::new();
        };
        match event {
            ResponseStreamEvent::OutputTextDelta { delta } => {
                if delta.is_empty() {
                    return Vec::new();
                }
                self.explanation.push_str(&delta);
                vec![ClientEvent::Delta { data: delta }]
            }
            ResponseStreamEvent::OutputItemDone { item } => match item {
                OutputItem::FunctionCall { name, arguments } => {
                    if name.is_empty() {
                        return Vec::new();
                    }
                    vec![ClientEvent::Action {
                        action: name,
                        params: parse_tool_arguments(&arguments),
                    }]
                }
                OutputItem::Message { content } => {
                    for part in content {
                        if let ContentPart::OutputText { text } = part
                            && !text.is_empty()
                        {
                            self.explanation.push_str(&text);
                        }
                    }
                    Vec::new()
                }
                OutputItem::Other => Vec::new(),
            },
            ResponseStreamEvent::Other => Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<ClientEvent> {
        vec![ClientEvent::Done {
            explanation: self.explanation,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deltas_forward_then_single_done_with_full_text() {
        let mut stream = ResponsesToolStream::new();
        let events =
            stream.push_data(r#"{"type":"response.output_text.delta","delta":"Hel"}"#);
        assert_eq!(
            events,
            vec![ClientEvent::Delta {
                data: "Hel".to_string()
            }]
        );
        stream.push_data(r#"{"type":"response.output_text.delta","delta":"lo"}"#);

        let events = stream.finish();
        assert_eq!(
            events,
            vec![ClientEvent::Done {
                explanation: "Hello".to_string()
            }]
        );
    }

    #[test]
    fn completed_function_call_emits_action_immediately() {
        let mut stream = ResponsesToolStream::new();
        let events = stream.push_data(
            r#"{"type":"response.output_item.done","item":{"type":"function_call","name":"add_component","arguments":"{\"name\":\"btn1\"}"}}"#,
        );
        assert_eq!(
            events,
            vec![ClientEvent::Action {
                action: "add_component".to_string(),
                params: json!({"name": "btn1"}),
            }]
        );
    }

    #[test]
    fn completed_message_folds_into_explanation_without_delta() {
        let mut stream = ResponsesToolStream::new();
        let events = stream.push_data(
            r#"{"type":"response.output_item.done","item":{"type":"message","content":[{"type":"output_text","text":"All set."}]}}"#,
        );
        assert!(events.is_empty());
        assert_eq!(
            stream.finish(),
            vec![ClientEvent::Done {
                explanation: "All set.".to_string()
            }]
        );
    }

    #[test]
    fn broken_function_arguments_degrade_to_empty_params() {
        let mut stream = ResponsesToolStream::new();
        let events = stream.push_data(
            r#"{"type":"response.output_item.done","item":{"type":"function_call","name":"remove_component","arguments":"nope"}}"#,
        );
        assert_eq!(
            events,
            vec![ClientEvent::Action {
                action: "remove_component".to_string(),
                params: json!({}),
            }]
        );
    }

    #[test]
    fn unknown_and_malformed_lines_are_skipped() {
        let mut stream = ResponsesToolStream::new();
        assert!(stream.push_data("garbage").is_empty());
        assert!(
            stream
                .push_data(r#"{"type":"response.created","response":{}}"#)
                .is_empty()
        );
        assert!(
            stream
                .push_data(r#"{"type":"response.output_item.done","item":{"type":"reasoning"}}"#)
                .is_empty()
        );
    }
}
