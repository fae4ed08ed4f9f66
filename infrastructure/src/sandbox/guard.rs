//! Path containment guard

use super::root::SandboxRoot;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A path could not be placed inside the sandbox
#[derive(Error, Debug)]
pub enum ContainmentError {
    #[error("sandbox root '{}' is not accessible: {source}", .path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sandbox root '{}' is not a directory", .0.display())]
    RootNotADirectory(PathBuf),

    #[error("\"{requested}\" is outside the permitted working directory")]
    OutsideRoot { requested: String, resolved: PathBuf },
}

impl ContainmentError {
    /// The path as the caller supplied it, for escapes
    pub fn requested(&self) -> Option<&str> {
        match self {
            ContainmentError::OutsideRoot { requested, .. } => Some(requested),
            _ => None,
        }
    }
}

/// Resolves caller-supplied relative paths against a [`SandboxRoot`].
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: SandboxRoot,
}

impl PathGuard {
    pub fn new(root: SandboxRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SandboxRoot {
        &self.root
    }

    /// Resolve `relative` to an absolute path inside the root.
    ///
    /// `.` and `..` are folded lexically, then the deepest existing ancestor
    /// is canonicalized (following symlinks) and the not-yet-existing tail is
    /// re-attached. An absolute `relative` replaces the root and is rejected
    /// unless it happens to point inside it.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, ContainmentError> {
        let outside = |resolved: PathBuf| ContainmentError::OutsideRoot {
            requested: relative.to_string(),
            resolved,
        };

        let normalized = normalize(&self.root.path().join(relative));
        let resolved = canonicalize_existing_prefix(&normalized)
            .map_err(|_| outside(normalized.clone()))?;

        if !self.root.contains(&resolved) {
            debug!(
                requested = relative,
                resolved = %resolved.display(),
                "Rejected path outside sandbox"
            );
            return Err(outside(resolved));
        }

        Ok(resolved)
    }
}

/// Fold `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize the deepest existing ancestor of `path` and re-append the rest.
///
/// A dangling symlink in the tail cannot be proven to stay inside the root,
/// so it is reported as an error.
fn canonicalize_existing_prefix(path: &Path) -> io::Result<PathBuf> {
    for ancestor in path.ancestors() {
        let Ok(canonical) = std::fs::canonicalize(ancestor) else {
            continue;
        };
        let tail = path.strip_prefix(ancestor).map_err(io::Error::other)?;
        // Joining an empty tail would append a trailing separator
        if tail.as_os_str().is_empty() {
            return Ok(canonical);
        }

        if let Some(first) = tail.components().next() {
            let next = canonical.join(first.as_os_str());
            if let Ok(meta) = std::fs::symlink_metadata(&next)
                && meta.file_type().is_symlink()
            {
                return Err(io::Error::other(format!(
                    "dangling symlink '{}'",
                    next.display()
                )));
            }
        }

        return Ok(canonical.join(tail));
    }

    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no existing ancestor for '{}'", path.display()),
    ))
}
