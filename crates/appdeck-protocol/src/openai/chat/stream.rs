use serde::Deserialize;

/// One decoded chat-completions stream chunk. Fields default so that
/// partial or vendor-extended chunks still decode.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChatChunkChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunkChoice {
    #[serde(default)]
    pub delta: ChatChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallFragment>,
}

/// Partial tool invocation tagged with the provider-assigned index.
/// `name` arrives on some fragment (usually the first); `arguments`
/// accumulates as raw JSON text across fragments.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallFragment {
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub function: FunctionFragment,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionFragment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}
