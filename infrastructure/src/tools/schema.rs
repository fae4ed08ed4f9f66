//! Function declaration converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the OpenAPI-style
//! declarations used by the Gemini `functionDeclarations` field.

use workbench_application::ports::tool_schema::ToolSchemaPort;
use workbench_domain::tool::entities::ToolDefinition;

/// Converts tool definitions to `{name, description, parameters}` objects.
///
/// Handles param_type → schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"array"` → `"array"` of strings
/// - `"number"`, `"integer"`, `"boolean"` → themselves
/// - anything else → `"string"`
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let mut prop = serde_json::Map::new();
            match param.param_type.as_str() {
                "array" => {
                    prop.insert("type".to_string(), serde_json::json!("array"));
                    prop.insert("items".to_string(), serde_json::json!({ "type": "string" }));
                }
                other => {
                    let schema_type = match other {
                        "number" => "number",
                        "integer" => "integer",
                        "boolean" => "boolean",
                        _ => "string",
                    };
                    prop.insert("type".to_string(), serde_json::json!(schema_type));
                }
            }
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}
