//! Shared helpers for tool use cases.

use workbench_domain::core::string::truncate;
use workbench_domain::tool::entities::ToolCall;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`path`, `file_path`, `directory`, `dir`)
/// first, then falls back to the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["path", "file_path", "directory", "dir"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(*key) {
            return truncate(s, 50);
        }
    }
    // Fallback: first string value, in key order for stable output
    let mut names: Vec<&String> = call.arguments.keys().collect();
    names.sort();
    for name in names {
        if let Some(s) = call.arguments[name].as_str() {
            return truncate(s, 50);
        }
    }
    String::new()
}
