//! Tool definitions exposed to the language model.
//!
//! The registry is a fixed set declared at process start: one tool per
//! external data source. The same slice is handed to the model on every
//! turn so its selection space is stable within a request.

use crate::ToolDefinition;

/// Create the tool definitions Scout exposes to the model.
pub fn builtin_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "search_sportsdb".to_string(),
            description: "Search for football player information from TheSportsDB. \
                          Returns player stats, team, nationality, position, height, \
                          weight, and biography."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "player_name": {
                        "type": "string",
                        "description": "The name of the football player to search for"
                    }
                },
                "required": ["player_name"]
            }),
        },
        ToolDefinition {
            name: "search_wikipedia".to_string(),
            description: "Search for football player information from Wikipedia. \
                          Returns detailed biography, career information, and images."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "player_name": {
                        "type": "string",
                        "description": "The name of the football player to search for"
                    }
                },
                "required": ["player_name"]
            }),
        },
    ]
}

/// Convert a tool definition to the Ollama chat API format.
pub fn to_ollama_tool(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}
