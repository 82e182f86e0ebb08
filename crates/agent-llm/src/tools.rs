//! Tool descriptions handed to the model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the model sees of one tool
///
/// Built from an `agent_tools::Tool` by the executor on every call, so the
/// `name` here is the one the model must echo back in a tool-use block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    /// Free-text hint telling the model when the tool is useful
    pub description: String,
    /// JSON Schema of the arguments object
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// JSON Schema shorthands for tool arguments
///
/// ```
/// use agent_llm::tools::schema;
/// use serde_json::json;
///
/// let args = schema::object(
///     json!({ "query": schema::string("TICKER|question") }),
///     vec!["query"],
/// );
/// assert_eq!(args["properties"]["query"]["type"], "string");
/// ```
pub mod schema {
    use serde_json::{Value, json};

    /// Object with the given properties, `required` listing mandatory keys
    pub fn object(properties: Value, required: Vec<&str>) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn string(description: &str) -> Value {
        json!({ "type": "string", "description": description })
    }
}
