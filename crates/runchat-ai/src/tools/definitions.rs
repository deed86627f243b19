//! JSON Schema declarations of the local functions.

use crate::ToolDefinition;

use super::registry::ToolName;

/// Declarations for every [`ToolName`], in the order the assistant sees them.
pub fn builtin_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: ToolName::CurrentWeather.as_str().to_string(),
            description: "주어진 도시의 현재 날씨를 반환".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "도시 이름 (영어로 변환해서 전달)"
                    },
                    "unit": {
                        "type": "string",
                        "enum": ["celsius", "fahrenheit"]
                    }
                },
                "required": ["location"]
            }),
        },
        ToolDefinition {
            name: ToolName::CurrentTime.as_str().to_string(),
            description: "주어진 도시의 현재 시간을 반환".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "도시 이름 (영어로 변환해서 전달)"
                    }
                },
                "required": ["location"]
            }),
        },
    ]
}

/// Convert a tool definition to the Assistants API `function` tool format.
pub fn to_assistant_tool(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}
