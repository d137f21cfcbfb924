use appdeck_protocol::openai::types::ToolDefinition;
use serde_json::json;

pub const ADD_COMPONENT: &str = "add_component";
pub const REMOVE_COMPONENT: &str = "remove_component";

/// The fixed tool surface exposed to the model in tool-calling mode. The
/// client executes these through the editor's real dispatch system, so
/// they work regardless of the app's root type.
pub fn editor_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            ADD_COMPONENT,
            "Add a UI component to the app canvas at a specific position",
            json!({
                "type": "object",
                "properties": {
                    "comp_type": {
                        "type": "string",
                        "description": "Component type (e.g. text, button, input, table, select, image)"
                    },
                    "name": {
                        "type": "string",
                        "description": "Unique display name for the component (e.g. welcomeText, submitBtn)"
                    },
                    "props": {
                        "type": "object",
                        "description": "Component-specific properties as key-value pairs"
                    },
                    "x": {"type": "integer", "description": "X grid position (0-23)"},
                    "y": {"type": "integer", "description": "Y grid position (row number)"},
                    "w": {"type": "integer", "description": "Width in grid columns (1-24)"},
                    "h": {"type": "integer", "description": "Height in grid rows"}
                },
                "required": ["comp_type", "name"]
            }),
        ),
        ToolDefinition::function(
            REMOVE_COMPONENT,
            "Remove a component from the canvas by name",
            json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Name of the component to remove"
                    }
                },
                "required": ["name"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_are_stable() {
        let tools = editor_tools();
        let names: Vec<&str> = tools
            .iter()
            .map(|tool| tool.function.name.as_str())
            .collect();
        assert_eq!(names, vec![ADD_COMPONENT, REMOVE_COMPONENT]);
    }

    #[test]
    fn add_component_requires_type_and_name() {
        let tools = editor_tools();
        let required = &tools[0].function.parameters["required"];
        assert_eq!(required, &serde_json::json!(["comp_type", "name"]));
    }
}
