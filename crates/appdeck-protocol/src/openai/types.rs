use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A function tool exposed to the model, in the shape both upstream APIs
/// accept. `parameters` is a JSON Schema object and stays opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub r#type: ToolType,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    Function,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: JsonValue,
}

impl ToolDefinition {
    pub fn function(name: &str, description: &str, parameters: JsonValue) -> Self {
        Self {
            r#type: ToolType::Function,
            function: FunctionDefinition {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// Constrained output shape shared by `response_format` (chat) and
/// `text.format` (responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFormat {
    pub r#type: OutputFormatType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormatType {
    JsonObject,
}

impl OutputFormat {
    pub fn json_object() -> Self {
        Self {
            r#type: OutputFormatType::JsonObject,
        }
    }
}
