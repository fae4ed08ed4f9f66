//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The closed set of operations the agent may perform.
///
/// Dispatch matches exhaustively over this enum, so adding a tool forces
/// every executor to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    ListDirectory,
    ReadFile,
    WriteFile,
    RunScript,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::ListDirectory,
        ToolKind::ReadFile,
        ToolKind::WriteFile,
        ToolKind::RunScript,
    ];

    /// Canonical name exposed to the decision engine
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::ListDirectory => "list_directory",
            ToolKind::ReadFile => "read_file",
            ToolKind::WriteFile => "write_file",
            ToolKind::RunScript => "run_script",
        }
    }

    /// Look up a tool kind by canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Whether the tool mutates the sandbox or runs code
    pub fn is_mutating(&self) -> bool {
        matches!(self, ToolKind::WriteFile | ToolKind::RunScript)
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool that can be used by the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Which tool this declares
    pub kind: ToolKind,
    /// Unique name of the tool (e.g., "read_file")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint ("string", "path", "array")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(kind: ToolKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: kind.as_str().to_string(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Registry of tool declarations available to the agent
///
/// Built once at startup and read-only afterwards. Declarations are kept in
/// [`ToolKind`] order so the schema sent to the model is stable.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: BTreeMap<ToolKind, ToolDefinition>,
    /// Alias → tool kind mapping (e.g. "get_file_content" → read_file)
    aliases: HashMap<String, ToolKind>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.kind, tool);
        self
    }

    /// Register a single alias mapping (builder pattern)
    pub fn register_alias(mut self, alias: impl Into<String>, kind: ToolKind) -> Self {
        self.aliases.insert(alias.into(), kind);
        self
    }

    /// Register multiple aliases at once (builder pattern)
    pub fn register_aliases(
        mut self,
        mappings: impl IntoIterator<Item = (impl Into<String>, ToolKind)>,
    ) -> Self {
        for (alias, kind) in mappings {
            self.aliases.insert(alias.into(), kind);
        }
        self
    }

    /// Resolve an alias to its tool kind (aliases only, not canonical names)
    pub fn resolve_alias(&self, name: &str) -> Option<ToolKind> {
        self.aliases.get(name).copied()
    }

    /// Resolve a name: canonical names first, then aliases.
    ///
    /// Only kinds that are actually registered resolve.
    pub fn resolve(&self, name: &str) -> Option<ToolKind> {
        ToolKind::from_name(name)
            .filter(|kind| self.tools.contains_key(kind))
            .or_else(|| {
                self.resolve_alias(name)
                    .filter(|kind| self.tools.contains_key(kind))
            })
    }

    pub fn get(&self, kind: ToolKind) -> Option<&ToolDefinition> {
        self.tools.get(&kind)
    }

    /// Get tool definition by canonical name or alias
    pub fn get_resolved(&self, name: &str) -> Option<&ToolDefinition> {
        self.resolve(name).and_then(|kind| self.tools.get(&kind))
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.values().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments, as requested by the decision engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call (may be unknown or an alias)
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
    /// Provider-assigned id used to correlate the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_id: Option<String>,
    /// Opaque provider token that has to be replayed with this call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            native_id: None,
            signature: None,
        }
    }

    /// Build a call from a provider tool-use block
    pub fn from_native(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            tool_name: name.into(),
            arguments,
            native_id: Some(id.into()),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: Option<String>) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get the first string argument present among `keys`
    pub fn get_string_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get_string(k))
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get a list of strings.
    ///
    /// Accepts a JSON array of strings or a single whitespace-separated
    /// string. A missing argument yields an empty list.
    pub fn get_string_list(&self, key: &str) -> Result<Vec<String>, String> {
        match self.arguments.get(key) {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(serde_json::Value::String(s)) => {
                Ok(s.split_whitespace().map(str::to_string).collect())
            }
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => Ok(s.clone()),
                    serde_json::Value::Number(n) => Ok(n.to_string()),
                    serde_json::Value::Bool(b) => Ok(b.to_string()),
                    other => Err(format!("Argument '{}' contains a non-string item: {}", key, other)),
                })
                .collect(),
            Some(other) => Err(format!(
                "Argument '{}' must be a string or a list of strings, got {}",
                key, other
            )),
        }
    }

    /// Remove arguments the decision engine is never allowed to set.
    ///
    /// Returns the names that were stripped.
    pub fn strip_reserved(&mut self, reserved: &[&str]) -> Vec<String> {
        let mut stripped = Vec::new();
        for key in reserved {
            if self.arguments.remove(*key).is_some() {
                stripped.push((*key).to_string());
            }
        }
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ToolSpec {
        ToolSpec::new()
            .register(ToolDefinition::new(ToolKind::ReadFile, "Read file"))
            .register(ToolDefinition::new(ToolKind::RunScript, "Run script"))
            .register_alias("get_file_content", ToolKind::ReadFile)
            .register_alias("get_files_info", ToolKind::ListDirectory)
    }

    #[test]
    fn test_tool_kind_names() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("delete_everything"), None);
        assert!(ToolKind::WriteFile.is_mutating());
        assert!(!ToolKind::ListDirectory.is_mutating());
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new(ToolKind::ReadFile, "Read file contents").with_parameter(
            ToolParameter::new("path", "File path to read", true).with_type("path"),
        );

        assert_eq!(tool.name, "read_file");
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameter("path").unwrap().param_type, "path");
        assert!(tool.parameter("missing").is_none());
    }

    #[test]
    fn test_tool_spec_resolve() {
        let spec = spec();

        assert_eq!(spec.resolve("read_file"), Some(ToolKind::ReadFile));
        assert_eq!(spec.resolve("get_file_content"), Some(ToolKind::ReadFile));
        assert_eq!(spec.resolve("unknown"), None);
        // Declared kind but not registered
        assert_eq!(spec.resolve("write_file"), None);
        // Alias to an unregistered kind does not resolve
        assert_eq!(spec.resolve("get_files_info"), None);
        assert_eq!(spec.resolve_alias("get_files_info"), Some(ToolKind::ListDirectory));
    }

    #[test]
    fn test_tool_spec_is_ordered_by_kind() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new(ToolKind::RunScript, "Run"))
            .register(ToolDefinition::new(ToolKind::ListDirectory, "List"))
            .register(ToolDefinition::new(ToolKind::WriteFile, "Write"));

        let names: Vec<&str> = spec.names().collect();
        assert_eq!(names, vec!["list_directory", "write_file", "run_script"]);
        assert_eq!(spec.len(), 3);
    }

    #[test]
    fn test_get_resolved_via_alias() {
        let spec = spec();
        assert_eq!(spec.get_resolved("get_file_content").unwrap().name, "read_file");
        assert!(spec.get_resolved("nope").is_none());
    }

    #[test]
    fn test_tool_call_arguments() {
        let call = ToolCall::new("read_file")
            .with_arg("file_path", "main.py")
            .with_arg("count", 3);

        assert_eq!(call.get_string("file_path"), Some("main.py"));
        assert_eq!(call.get_string_any(&["path", "file_path"]), Some("main.py"));
        assert!(call.require_string("path").is_err());
        assert_eq!(call.get_string("count"), None);
    }

    #[test]
    fn test_get_string_list() {
        let call = ToolCall::new("run_script")
            .with_arg("list", serde_json::json!(["a", "b c", 3]))
            .with_arg("line", "x  y z")
            .with_arg("bad", serde_json::json!({"k": "v"}));

        assert_eq!(call.get_string_list("list").unwrap(), vec!["a", "b c", "3"]);
        assert_eq!(call.get_string_list("line").unwrap(), vec!["x", "y", "z"]);
        assert!(call.get_string_list("missing").unwrap().is_empty());
        assert!(call.get_string_list("bad").is_err());
    }

    #[test]
    fn test_strip_reserved() {
        let mut call = ToolCall::new("read_file")
            .with_arg("path", "a.txt")
            .with_arg("working_directory", "/");

        let stripped = call.strip_reserved(&["working_directory", "sandbox_root"]);
        assert_eq!(stripped, vec!["working_directory".to_string()]);
        assert!(!call.arguments.contains_key("working_directory"));
        assert_eq!(call.get_string("path"), Some("a.txt"));
    }
}
