//! Tool implementations for the agent
//!
//! Sandboxed implementations of the four tools the agent can call.
//! Every path argument goes through [`PathGuard`](crate::sandbox::PathGuard)
//! before any I/O.

pub mod file;
pub mod script;

mod executor;
mod schema;

pub use executor::{LocalToolExecutor, RESERVED_ARGS};
pub use schema::JsonSchemaToolConverter;
pub use script::ScriptConfig;

use workbench_domain::tool::entities::{ToolKind, ToolSpec};

/// Create the default tool specification with all four tools and the
/// legacy names models still use for them.
pub fn default_tool_spec(script: &ScriptConfig) -> ToolSpec {
    ToolSpec::new()
        .register(file::list_directory_definition())
        .register(file::read_file_definition())
        .register(file::write_file_definition())
        .register(script::run_script_definition(script))
        .register_aliases([
            ("get_files_info", ToolKind::ListDirectory),
            ("get_file_content", ToolKind::ReadFile),
            ("run_python_file", ToolKind::RunScript),
        ])
}
