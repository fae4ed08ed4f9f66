//! File operation tools: list_directory, read_file, write_file

use crate::sandbox::PathGuard;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;
use workbench_domain::core::string::char_prefix;
use workbench_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolKind, ToolParameter},
    value_objects::{ToolError, ToolErrorKind, ToolResult, ToolResultMetadata},
};

/// Tool name constants
pub const LIST_DIRECTORY: &str = "list_directory";
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";

/// Default number of characters returned by read_file
pub const DEFAULT_MAX_READ_CHARS: usize = 10_000;

/// Get the tool definition for list_directory
pub fn list_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::ListDirectory,
        "Lists files in the specified directory along with their sizes, constrained to the working directory.",
    )
    .with_parameter(
        ToolParameter::new(
            "directory",
            "The directory to list files from, relative to the working directory. If not provided, lists files in the working directory itself.",
            false,
        )
        .with_type("path"),
    )
}

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::ReadFile,
        "Reads the contents of the specified file, constrained to the working directory. Long files are truncated.",
    )
    .with_parameter(
        ToolParameter::new(
            "path",
            "The file path to read from, relative to the working directory.",
            true,
        )
        .with_type("path"),
    )
}

/// Get the tool definition for write_file
pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::WriteFile,
        "Writes the provided content to the specified file, constrained to the working directory. Missing parent directories are created and existing files are overwritten.",
    )
    .with_parameter(
        ToolParameter::new(
            "path",
            "The file path to write to, relative to the working directory.",
            true,
        )
        .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("content", "The content to write to the file.", true)
            .with_type("string"),
    )
}

/// Read the `path` argument, accepting the legacy `file_path` name.
pub(crate) fn path_argument<'a>(call: &'a ToolCall, tool: &str) -> Result<&'a str, ToolResult> {
    call.get_string_any(&["path", "file_path"]).ok_or_else(|| {
        ToolResult::failure(
            tool,
            ToolError::invalid_argument("Missing required argument: path"),
        )
    })
}

/// Resolve `requested` inside the sandbox or produce the failure result.
pub(crate) fn resolve(guard: &PathGuard, requested: &str, tool: &str) -> Result<PathBuf, ToolResult> {
    guard
        .resolve(requested)
        .map_err(|_| ToolResult::failure(tool, ToolError::containment_violation(requested)))
}

/// Execute the list_directory tool
pub fn execute_list_directory(guard: &PathGuard, call: &ToolCall) -> ToolResult {
    let start = Instant::now();
    let directory = call.get_string_any(&["directory", "dir"]).unwrap_or(".");

    let target = match resolve(guard, directory, LIST_DIRECTORY) {
        Ok(p) => p,
        Err(failure) => return failure,
    };

    if !target.exists() {
        return ToolResult::failure(
            LIST_DIRECTORY,
            ToolError::new(
                ToolErrorKind::NotFound,
                format!("Directory not found: \"{}\"", directory),
            ),
        );
    }
    if !target.is_dir() {
        return ToolResult::failure(
            LIST_DIRECTORY,
            ToolError::new(
                ToolErrorKind::NotADirectory,
                format!("\"{}\" is not a directory", directory),
            ),
        );
    }

    let read_dir = match fs::read_dir(&target) {
        Ok(entries) => entries,
        Err(e) => {
            return ToolResult::failure(
                LIST_DIRECTORY,
                ToolError::new(
                    ToolErrorKind::ReadFailure,
                    format!("Failed to list \"{}\": {}", directory, e),
                ),
            );
        }
    };

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                return ToolResult::failure(
                    LIST_DIRECTORY,
                    ToolError::new(
                        ToolErrorKind::ReadFailure,
                        format!("Failed to list \"{}\": {}", directory, e),
                    ),
                );
            }
        };
        // Follow symlinks for size and type, like a plain stat would
        let (size, is_dir) = match fs::metadata(entry.path()) {
            Ok(meta) => (meta.len(), meta.is_dir()),
            Err(_) => (0, false),
        };
        entries.push((entry.file_name().to_string_lossy().into_owned(), size, is_dir));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut output = if directory == "." {
        "Result for current directory:\n".to_string()
    } else {
        format!("Result for '{}' directory:\n", directory)
    };
    for (name, size, is_dir) in &entries {
        output.push_str(&format!(
            "  - {}: file_size={} bytes, is_dir={}\n",
            name, size, is_dir
        ));
    }

    ToolResult::success(LIST_DIRECTORY, output).with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        path: Some(directory.to_string()),
        entry_count: Some(entries.len()),
        ..Default::default()
    })
}

/// Execute the read_file tool
///
/// Returns at most `max_chars` characters; longer files get a truncation
/// marker naming the file and the cap.
pub fn execute_read_file(guard: &PathGuard, call: &ToolCall, max_chars: usize) -> ToolResult {
    let start = Instant::now();

    let path_str = match path_argument(call, READ_FILE) {
        Ok(p) => p,
        Err(failure) => return failure,
    };
    let path = match resolve(guard, path_str, READ_FILE) {
        Ok(p) => p,
        Err(failure) => return failure,
    };

    if !path.exists() {
        return ToolResult::failure(READ_FILE, ToolError::not_found(path_str));
    }
    if !path.is_file() {
        return ToolResult::failure(
            READ_FILE,
            ToolError::new(
                ToolErrorKind::NotRegularFile,
                format!("\"{}\" is not a regular file", path_str),
            ),
        );
    }

    let read_failure = |detail: String| {
        ToolResult::failure(
            READ_FILE,
            ToolError::new(
                ToolErrorKind::ReadFailure,
                format!("Failed to read \"{}\": {}", path_str, detail),
            ),
        )
    };

    // One char is at most 4 bytes, so this is enough to see cap + 1 chars
    let byte_limit = (max_chars as u64 + 1) * 4;
    let mut bytes = Vec::new();
    let read = fs::File::open(&path)
        .and_then(|file| file.take(byte_limit).read_to_end(&mut bytes));
    let bytes_read = match read {
        Ok(n) => n,
        Err(e) => return read_failure(e.to_string()),
    };

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        // A multi-byte char cut by the byte limit is fine; anything else is not text
        Err(e)
            if e.utf8_error().error_len().is_none() && bytes_read as u64 == byte_limit =>
        {
            let valid = e.utf8_error().valid_up_to();
            let mut bytes = e.into_bytes();
            bytes.truncate(valid);
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Err(e) => return read_failure(format!("not valid UTF-8 ({})", e.utf8_error())),
    };

    let content = match char_prefix(&text, max_chars) {
        Some(prefix) => format!(
            "{}[...File \"{}\" truncated at {} characters]",
            prefix, path_str, max_chars
        ),
        None => text,
    };

    ToolResult::success(READ_FILE, content).with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        bytes: Some(bytes_read),
        path: Some(path_str.to_string()),
        ..Default::default()
    })
}

/// Execute the write_file tool
pub fn execute_write_file(guard: &PathGuard, call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let path_str = match path_argument(call, WRITE_FILE) {
        Ok(p) => p,
        Err(failure) => return failure,
    };
    let content = match call.require_string("content") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };
    let path = match resolve(guard, path_str, WRITE_FILE) {
        Ok(p) => p,
        Err(failure) => return failure,
    };

    if path.is_dir() {
        return ToolResult::failure(
            WRITE_FILE,
            ToolError::new(
                ToolErrorKind::WriteFailure,
                format!("Cannot write to \"{}\": it is a directory", path_str),
            ),
        );
    }

    if let Some(parent) = path.parent()
        && !parent.exists()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return ToolResult::failure(
            WRITE_FILE,
            ToolError::new(
                ToolErrorKind::DirectoryCreationFailure,
                format!("Failed to create parent directories for \"{}\": {}", path_str, e),
            ),
        );
    }

    if let Err(e) = fs::write(&path, content) {
        return ToolResult::failure(
            WRITE_FILE,
            ToolError::new(
                ToolErrorKind::WriteFailure,
                format!("Failed to write \"{}\": {}", path_str, e),
            ),
        );
    }

    ToolResult::success(
        WRITE_FILE,
        format!(
            "Successfully wrote to \"{}\" ({} characters written)",
            path_str,
            content.chars().count()
        ),
    )
    .with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        bytes: Some(content.len()),
        path: Some(path_str.to_string()),
        ..Default::default()
    })
}
