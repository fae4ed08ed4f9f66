//! Sandbox root directory

use super::guard::ContainmentError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Canonical, absolute directory that bounds every tool operation.
///
/// Built once at startup; the path never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxRoot {
    path: PathBuf,
}

impl SandboxRoot {
    /// Canonicalize `path` and check that it is a directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ContainmentError> {
        let requested = path.as_ref();
        let canonical = std::fs::canonicalize(requested).map_err(|source| {
            ContainmentError::RootUnavailable {
                path: requested.to_path_buf(),
                source,
            }
        })?;

        if !canonical.is_dir() {
            return Err(ContainmentError::RootNotADirectory(canonical));
        }

        Ok(Self { path: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `candidate` lies at or below the root, compared component-wise.
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate.starts_with(&self.path)
    }
}

impl AsRef<Path> for SandboxRoot {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SandboxRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a");
        std::fs::create_dir(&nested).unwrap();

        let root = SandboxRoot::new(nested.join("..").join("a")).unwrap();
        assert_eq!(root.path(), std::fs::canonicalize(&nested).unwrap());
        assert!(root.path().is_absolute());
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = SandboxRoot::new(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ContainmentError::RootUnavailable { .. }));
    }

    #[test]
    fn test_file_root_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();

        let err = SandboxRoot::new(&file).unwrap_err();
        assert!(matches!(err, ContainmentError::RootNotADirectory(_)));
    }

    #[test]
    fn test_contains_is_component_wise() {
        let dir = tempfile::tempdir().unwrap();
        let work = dir.path().join("work");
        std::fs::create_dir(&work).unwrap();
        let root = SandboxRoot::new(&work).unwrap();

        let sibling = root.path().with_file_name("work2");
        assert!(!root.contains(&sibling));
        assert!(root.contains(&root.path().join("file.txt")));
        assert!(root.contains(root.path()));
    }
}
