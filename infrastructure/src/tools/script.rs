//! Script execution tool: run_script
//!
//! Runs a script inside the sandbox with the configured interpreter. The
//! child's working directory is the sandbox root and stdin is closed. On
//! unix the child leads its own process group, and that group is killed once
//! the script exits, times out, or is cancelled, so nothing it started keeps
//! touching the sandbox after the call returns.

use super::file::{path_argument, resolve};
use crate::sandbox::PathGuard;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use workbench_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolKind, ToolParameter},
    value_objects::{ToolError, ToolErrorKind, ToolResult, ToolResultMetadata},
};

/// Tool name constant
pub const RUN_SCRIPT: &str = "run_script";

/// Default timeout for script execution (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum captured size per stream (1 MiB)
const MAX_STREAM_SIZE: usize = 1024 * 1024;

/// How long to wait for the pipes to close after the process group is gone
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// How scripts are run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Program the script path is passed to (e.g. "python3")
    pub interpreter: String,
    /// Required file extension, without the dot
    pub extension: String,
    /// Wall-clock limit for one run
    pub timeout: Duration,
    /// Environment variables removed before the script starts
    pub hidden_env: Vec<String>,
}

impl ScriptConfig {
    /// Keep the given variables (API keys, mostly) out of the script's environment.
    pub fn with_hidden_env<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_env.extend(names.into_iter().map(Into::into));
        self
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            extension: "py".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            hidden_env: Vec::new(),
        }
    }
}

/// Get the tool definition for run_script
pub fn run_script_definition(config: &ScriptConfig) -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::RunScript,
        format!(
            "Runs the specified .{} script with optional arguments, constrained to the working directory. Output is returned with the exit code when it is non-zero.",
            config.extension
        ),
    )
    .with_parameter(
        ToolParameter::new(
            "path",
            "The script to run, relative to the working directory.",
            true,
        )
        .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("args", "Arguments to pass to the script, if needed.", false)
            .with_type("array"),
    )
}

/// How the wait on the script ended
enum Exit {
    Finished(io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

/// Execute the run_script tool
pub async fn execute_run_script(
    guard: &PathGuard,
    call: &ToolCall,
    config: &ScriptConfig,
    cancellation: Option<&CancellationToken>,
) -> ToolResult {
    let start = Instant::now();

    let path_str = match path_argument(call, RUN_SCRIPT) {
        Ok(p) => p,
        Err(failure) => return failure,
    };
    let path = match resolve(guard, path_str, RUN_SCRIPT) {
        Ok(p) => p,
        Err(failure) => return failure,
    };

    if !path.exists() {
        return ToolResult::failure(
            RUN_SCRIPT,
            ToolError::new(
                ToolErrorKind::NotFound,
                format!("File \"{}\" not found.", path_str),
            ),
        );
    }
    let has_extension = Path::new(path_str)
        .extension()
        .is_some_and(|ext| ext == config.extension.as_str());
    if !has_extension {
        return ToolResult::failure(
            RUN_SCRIPT,
            ToolError::new(
                ToolErrorKind::WrongExtension,
                format!("\"{}\" is not a .{} file.", path_str, config.extension),
            ),
        );
    }
    if !path.is_file() {
        return ToolResult::failure(
            RUN_SCRIPT,
            ToolError::new(
                ToolErrorKind::NotRegularFile,
                format!("\"{}\" is not a regular file", path_str),
            ),
        );
    }

    let args = match call.get_string_list("args") {
        Ok(a) => a,
        Err(e) => return ToolResult::failure(RUN_SCRIPT, ToolError::invalid_argument(e)),
    };

    let mut cmd = Command::new(&config.interpreter);
    cmd.arg(&path)
        .args(&args)
        .current_dir(guard.root().path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for name in &config.hidden_env {
        cmd.env_remove(name);
    }
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            return ToolResult::failure(
                RUN_SCRIPT,
                ToolError::execution_failed(format!(
                    "Failed to start {} for \"{}\": {}",
                    config.interpreter, path_str, e
                )),
            );
        }
    };
    let pid = child.id();
    debug!(script = path_str, pid = ?pid, "Spawned script");

    let stdout = child.stdout.take().map(|pipe| tokio::spawn(drain(pipe)));
    let stderr = child.stderr.take().map(|pipe| tokio::spawn(drain(pipe)));

    let exit = wait_for_exit(&mut child, config.timeout, cancellation).await;

    // Whatever the script left running goes with it
    if let Some(pid) = pid {
        kill_process_group(pid);
    }

    let status = match exit {
        Exit::Finished(Ok(status)) => status,
        Exit::Finished(Err(e)) => {
            return ToolResult::failure(
                RUN_SCRIPT,
                ToolError::execution_failed(format!("Failed to run \"{}\": {}", path_str, e)),
            );
        }
        Exit::TimedOut => {
            warn!(script = path_str, timeout = ?config.timeout, "Script timed out");
            let _ = child.kill().await;
            return ToolResult::failure(
                RUN_SCRIPT,
                ToolError::timeout(format!(
                    "\"{}\" did not finish within {:?}",
                    path_str, config.timeout
                )),
            );
        }
        Exit::Cancelled => {
            warn!(script = path_str, "Script cancelled");
            let _ = child.kill().await;
            return ToolResult::failure(
                RUN_SCRIPT,
                ToolError::cancelled(format!("run_script \"{}\"", path_str)),
            );
        }
    };

    let (stdout_raw, stderr_raw) = tokio::join!(collect(stdout), collect(stderr));
    let exit_code = status.code().unwrap_or(-1);
    let report = format_report(&capture(&stdout_raw), &capture(&stderr_raw), exit_code);

    ToolResult::success(RUN_SCRIPT, report).with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        bytes: Some(stdout_raw.len() + stderr_raw.len()),
        path: Some(path_str.to_string()),
        exit_code: Some(exit_code),
        ..Default::default()
    })
}

/// Wait for the script itself to exit, not for its pipes to close.
async fn wait_for_exit(
    child: &mut Child,
    limit: Duration,
    cancellation: Option<&CancellationToken>,
) -> Exit {
    let wait = tokio::time::timeout(limit, child.wait());
    let waited = match cancellation {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Exit::Cancelled,
                waited = wait => waited,
            }
        }
        None => wait.await,
    };
    match waited {
        Ok(status) => Exit::Finished(status),
        Err(_) => Exit::TimedOut,
    }
}

/// Read a pipe to EOF, keeping at most one byte past [`MAX_STREAM_SIZE`].
async fn drain<R: AsyncRead + Unpin>(mut pipe: R) -> Vec<u8> {
    let mut captured = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let room = (MAX_STREAM_SIZE + 1).saturating_sub(captured.len());
                captured.extend_from_slice(&chunk[..n.min(room)]);
            }
        }
    }
    captured
}

/// Join a drain task. A pipe still held open by a process outside the
/// group is abandoned after [`DRAIN_GRACE`].
async fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    let Some(mut handle) = reader else {
        return Vec::new();
    };
    match tokio::time::timeout(DRAIN_GRACE, &mut handle).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            warn!(error = %e, "Output reader failed");
            Vec::new()
        }
        Err(_) => {
            warn!("Script output still open after exit, discarding");
            handle.abort();
            Vec::new()
        }
    }
}

/// SIGKILL the process group led by `pid`. The group may already be empty.
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    // SAFETY: killpg only sends a signal; it touches no memory of ours
    let result = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
    if result == -1 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            warn!(pid, error = %err, "Failed to kill script process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

/// Decode a captured stream, capped at [`MAX_STREAM_SIZE`]
fn capture(raw: &[u8]) -> String {
    if raw.len() <= MAX_STREAM_SIZE {
        return String::from_utf8_lossy(raw).into_owned();
    }
    let mut text = String::from_utf8_lossy(&raw[..MAX_STREAM_SIZE]).into_owned();
    text.push_str("\n... (output truncated)");
    text
}

fn format_report(stdout: &str, stderr: &str, exit_code: i32) -> String {
    let mut report = if stdout.is_empty() && stderr.is_empty() {
        "No output produced.".to_string()
    } else {
        format!("STDOUT: {}\nSTDERR: {}", stdout, stderr)
    };
    if exit_code != 0 {
        report.push_str(&format!("\nProcess exited with code {}", exit_code));
    }
    report
}
