//! Construction of the four upstream request shapes: two backends
//! (API-key chat-completions vs. ChatGPT-session responses) in two modes
//! (document generation vs. tool calling).

use appdeck_protocol::openai::chat::request::{ChatMessage, CreateChatCompletionRequest};
use appdeck_protocol::openai::responses::request::{
    CreateResponseRequest, InputMessage, TextOptions,
};
use appdeck_protocol::openai::types::OutputFormat;
use serde_json::Value as JsonValue;

use crate::prompts::{DOCUMENT_SYSTEM_PROMPT, TOOL_SYSTEM_PROMPT};
use crate::tools::editor_tools;

pub const CHAT_COMPLETIONS_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const RESPONSES_ENDPOINT: &str = "https://chatgpt.com/backend-api/codex/responses";
pub const ACCOUNT_ID_HEADER: &str = "ChatGPT-Account-ID";

pub const COMPLETIONS_MODEL: &str = "gpt-4o";
pub const RESPONSES_MODEL: &str = "gpt-5-codex-mini";

const TEMPERATURE: f64 = 0.7;
const DOCUMENT_MAX_TOKENS: u32 = 16_000;

/// Document-mode user turn: the serialized current layout document (when
/// one exists) ahead of the literal request text.
pub fn document_user_message(current_dsl: Option<&JsonValue>, message: &str) -> String {
    let dsl_json = current_dsl
        .map(|dsl| dsl.to_string())
        .unwrap_or_else(|| "{}".to_string());
    if dsl_json == "{}" {
        return message.to_string();
    }
    format!("Current page DSL:\n```json\n{dsl_json}\n```\n\nUser request: {message}")
}

/// Tool-mode user turn: the names already on the canvas ahead of the
/// request text, so the model avoids collisions and can target removals.
pub fn tool_user_message(component_list: &[String], message: &str) -> String {
    if component_list.is_empty() {
        return message.to_string();
    }
    let names = serde_json::to_string(component_list).unwrap_or_else(|_| "[]".to_string());
    format!("Current components on canvas: {names}\n\nUser request: {message}")
}

pub fn document_completions_request(user_message: &str) -> CreateChatCompletionRequest {
    CreateChatCompletionRequest {
        model: COMPLETIONS_MODEL.to_string(),
        messages: vec![
            ChatMessage::system(DOCUMENT_SYSTEM_PROMPT),
            ChatMessage::user(user_message),
        ],
        temperature: Some(TEMPERATURE),
        max_tokens: Some(DOCUMENT_MAX_TOKENS),
        response_format: Some(OutputFormat::json_object()),
        tools: None,
        stream: None,
    }
}

pub fn tool_completions_request(user_message: &str) -> CreateChatCompletionRequest {
    CreateChatCompletionRequest {
        model: COMPLETIONS_MODEL.to_string(),
        messages: vec![
            ChatMessage::system(TOOL_SYSTEM_PROMPT),
            ChatMessage::user(user_message),
        ],
        temperature: Some(TEMPERATURE),
        max_tokens: None,
        response_format: None,
        tools: Some(editor_tools()),
        stream: Some(true),
    }
}

pub fn document_responses_request(user_message: &str) -> CreateResponseRequest {
    CreateResponseRequest {
        model: RESPONSES_MODEL.to_string(),
        instructions: DOCUMENT_SYSTEM_PROMPT.to_string(),
        input: vec![InputMessage::user(format!(
            "{user_message}\n\nRespond in JSON format."
        ))],
        text: Some(TextOptions {
            format: OutputFormat::json_object(),
        }),
        tools: None,
        // The session backend streams everything and must not persist
        // conversations server-side.
        stream: true,
        store: false,
    }
}

pub fn tool_responses_request(user_message: &str) -> CreateResponseRequest {
    CreateResponseRequest {
        model: RESPONSES_MODEL.to_string(),
        instructions: TOOL_SYSTEM_PROMPT.to_string(),
        input: vec![InputMessage::user(user_message)],
        text: None,
        tools: Some(editor_tools()),
        stream: true,
        store: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_turn_prefixes_current_dsl() {
        let dsl = json!({"ui": {"compType": "page"}});
        let turn = document_user_message(Some(&dsl), "add a button");
        assert!(turn.starts_with("Current page DSL:\n```json\n"));
        assert!(turn.contains(r#""compType":"page""#));
        assert!(turn.ends_with("User request: add a button"));
    }

    #[test]
    fn empty_dsl_leaves_turn_bare() {
        assert_eq!(document_user_message(None, "hi"), "hi");
        assert_eq!(document_user_message(Some(&json!({})), "hi"), "hi");
    }

    #[test]
    fn tool_turn_prefixes_component_names() {
        let turn = tool_user_message(&["btn1".to_string(), "table1".to_string()], "remove btn1");
        assert_eq!(
            turn,
            "Current components on canvas: [\"btn1\",\"table1\"]\n\nUser request: remove btn1"
        );
        assert_eq!(tool_user_message(&[], "hi"), "hi");
    }

    #[test]
    fn document_completions_shape() {
        let req = document_completions_request("hi");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["max_tokens"], 16000);
        assert!(value.get("stream").is_none());
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn tool_completions_streams_with_tools() {
        let value = serde_json::to_value(tool_completions_request("hi")).unwrap();
        assert_eq!(value["stream"], true);
        assert_eq!(value["tools"].as_array().unwrap().len(), 2);
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn document_responses_shape() {
        let value = serde_json::to_value(document_responses_request("hi")).unwrap();
        assert_eq!(value["model"], "gpt-5-codex-mini");
        assert_eq!(value["stream"], true);
        assert_eq!(value["store"], false);
        assert_eq!(value["text"]["format"]["type"], "json_object");
        let input = value["input"][0]["content"].as_str().unwrap();
        assert!(input.ends_with("Respond in JSON format."));
    }

    #[test]
    fn tool_responses_shape() {
        let value = serde_json::to_value(tool_responses_request("hi")).unwrap();
        assert_eq!(value["store"], false);
        assert_eq!(value["tools"].as_array().unwrap().len(), 2);
        assert!(value.get("text").is_none());
    }
}
