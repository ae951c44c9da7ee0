// Sandbox path resolver
//
// Every tool path is relative to the working directory root and must stay
// inside it after `..` segments and symlinks are resolved.

use crate::errors::ToolError;
use std::path::{Component, Path, PathBuf};

/// Fixed working-directory root shared by all tools
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root`, which must be an existing directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ToolError> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|e| ToolError::io(format!("Cannot resolve working directory {}", root.display()), e))?;
        if !canonical.is_dir() {
            return Err(ToolError::NotFound(format!(
                "The working directory is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self { root: canonical })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` against the root.
    ///
    /// The returned path is absolute and guaranteed to lie under the root.
    /// It may not exist yet; callers check the kind of the target.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, ToolError> {
        let joined = normalize_lexical(&self.root.join(relative));

        // Canonicalize the nearest existing ancestor so symlinks pointing
        // outside the root are caught even for not-yet-created files.
        let mut ancestor = joined.clone();
        let mut missing = Vec::new();
        while ancestor.symlink_metadata().is_err() {
            if let Some(name) = ancestor.file_name() {
                missing.push(name.to_os_string());
            }
            if !ancestor.pop() {
                break;
            }
        }
        let mut resolved = ancestor
            .canonicalize()
            .map_err(|e| ToolError::io(format!("Cannot resolve path {}", relative), e))?;
        // Pushed one component at a time: no trailing separator
        for name in missing.iter().rev() {
            resolved.push(name);
        }

        if !resolved.starts_with(&self.root) {
            tracing::warn!(path = relative, "Rejected path outside the working directory");
            return Err(ToolError::PathEscape(relative.to_string()));
        }

        Ok(resolved)
    }
}

/// Resolve `.` and `..` components without touching the filesystem
fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::ParentDir => {
                // Don't pop beyond root
                if !out.pop() {
                    out.push(comp);
                }
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}
