use appdeck_protocol::openai::responses::stream::{
    ContentPart, OutputItem, ResponseStreamEvent,
};

/// Reassembles the session backend's streamed document response into the
/// complete text: `output_text.delta` fragments concatenate in arrival
/// order, and the first completed message item short-circuits with its
/// authoritative full text.
#[derive(Debug, Default)]
pub struct DocumentReassembly {
    fragments: String,
    complete: Option<String>,
}

impl DocumentReassembly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once a completed message item has been seen; the
    /// caller may stop feeding lines at that point.
    pub fn push_data(&mut self, data: &str) -> bool {
        if self.complete.is_some() {
            return true;
        }
        let Ok(event) = serde_json::from_str::<ResponseStreamEvent>(data) else {
            return false;
        };
        match event {
            ResponseStreamEvent::OutputTextDelta { delta } => {
                self.fragments.push_str(&delta);
            }
            ResponseStreamEvent::OutputItemDone {
                item: OutputItem::Message { content },
            } => {
                for part in content {
                    if let ContentPart::OutputText { text } = part
                        && !text.is_empty()
                    {
                        self.complete = Some(text);
                        return true;
                    }
                }
            }
            _ => {}
        }
        false
    }

    pub fn into_text(self) -> String {
        self.complete.unwrap_or(self.fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_delta_fragments() {
        let mut doc = DocumentReassembly::new();
        doc.push_data(r#"{"type":"response.output_text.delta","delta":"{\"a\":"}"#);
        doc.push_data(r#"{"type":"response.output_text.delta","delta":"1}"}"#);
        assert_eq!(doc.into_text(), "{\"a\":1}");
    }

    #[test]
    fn completed_message_wins_over_fragments() {
        let mut doc = DocumentReassembly::new();
        doc.push_data(r#"{"type":"response.output_text.delta","delta":"partial"}"#);
        let done = doc.push_data(
            r#"{"type":"response.output_item.done","item":{"type":"message","content":[{"type":"output_text","text":"{\"whole\":true}"}]}}"#,
        );
        assert!(done);
        assert_eq!(doc.into_text(), "{\"whole\":true}");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let mut doc = DocumentReassembly::new();
        assert!(!doc.push_data("junk"));
        doc.push_data(r#"{"type":"response.output_text.delta","delta":"ok"}"#);
        assert_eq!(doc.into_text(), "ok");
    }

    #[test]
    fn empty_stream_yields_empty_text() {
        assert_eq!(DocumentReassembly::new().into_text(), "");
    }
}
