use serde::Deserialize;

/// Responses-API stream event, dispatched on the embedded `type` tag.
/// Event kinds the gateway does not consume collapse into `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseStreamEvent {
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta {
        #[serde(default)]
        delta: String,
    },
    #[serde(rename = "response.output_item.done")]
    OutputItemDone { item: OutputItem },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum OutputItem {
    #[serde(rename = "function_call")]
    FunctionCall {
        #[serde(default)]
        name: String,
        #[serde(default)]
        arguments: String,
    },
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "output_text")]
    OutputText {
        #[serde(default)]
        text: String,
    },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_text_delta() {
        let event: ResponseStreamEvent =
            serde_json::from_str(r#"{"type":"response.output_text.delta","delta":"He"}"#).unwrap();
        match event {
            ResponseStreamEvent::OutputTextDelta { delta } => assert_eq!(delta, "He"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn decodes_completed_function_call() {
        let event: ResponseStreamEvent = serde_json::from_str(
            r#"{"type":"response.output_item.done","item":{"type":"function_call","name":"remove_component","arguments":"{\"name\":\"btn1\"}"}}"#,
        )
        .unwrap();
        match event {
            ResponseStreamEvent::OutputItemDone {
                item: OutputItem::FunctionCall { name, arguments },
            } => {
                assert_eq!(name, "remove_component");
                assert_eq!(arguments, "{\"name\":\"btn1\"}");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn decodes_completed_message() {
        let event: ResponseStreamEvent = serde_json::from_str(
            r#"{"type":"response.output_item.done","item":{"type":"message","content":[{"type":"output_text","text":"done"}]}}"#,
        )
        .unwrap();
        match event {
            ResponseStreamEvent::OutputItemDone {
                item: OutputItem::Message { content },
            } => match &content[0] {
                ContentPart::OutputText { text } => assert_eq!(text, "done"),
                other => panic!("unexpected part: {other:?}"),
            },
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_event_kind_collapses() {
        let event: ResponseStreamEvent =
            serde_json::from_str(r#"{"type":"response.created","response":{}}"#).unwrap();
        assert!(matches!(event, ResponseStreamEvent::Other));
    }
}
