//! Dotted module paths and their filesystem mapping.
//!
//! A Python module is addressed as `pkg.sub.mod` and lives on disk either as
//! `pkg/sub/mod.py` (file module) or `pkg/sub/mod/__init__.py` (package).

use crate::error::{PymodError, PymodResult};
use crate::types::ModuleKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A validated dotted module path, e.g. `pkg.sub.mod`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModulePath(String);

impl ModulePath {
    /// Parses a dotted path. Segments must be non-empty and free of
    /// whitespace and path separators.
    pub fn new(path: &str) -> PymodResult<Self> {
        if path.is_empty() {
            return Err(PymodError::InvalidModulePath("empty module path".into()));
        }
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(PymodError::InvalidModulePath(format!(
                    "empty segment in {path:?}"
                )));
            }
            if segment
                .chars()
                .any(|c| c.is_whitespace() || c == '/' || c == '\\')
            {
                return Err(PymodError::InvalidModulePath(format!(
                    "invalid segment {segment:?} in {path:?}"
                )));
            }
        }
        Ok(Self(path.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// The final segment, i.e. the module's own name.
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Appends one child segment.
    pub fn join(&self, child: &str) -> PymodResult<Self> {
        Self::new(&format!("{}.{child}", self.0))
    }

    /// Segment-wise prefix check: `pkg.sub` is a prefix of `pkg.sub.mod`
    /// but not of `pkg.submarine`.
    pub fn starts_with(&self, prefix: &ModulePath) -> bool {
        let mut own = self.segments();
        prefix.segments().all(|p| own.next() == Some(p))
    }

    /// Relative filesystem path of the module source file.
    pub fn to_fs_path(&self, kind: ModuleKind) -> PathBuf {
        match kind {
            ModuleKind::File => {
                let mut path: PathBuf = self.segments().collect();
                path.set_extension("py");
                path
            }
            ModuleKind::Package => self.to_dir_path().join("__init__.py"),
        }
    }

    /// Relative filesystem path of the directory named by the segments.
    /// For a package this is the package directory.
    pub fn to_dir_path(&self) -> PathBuf {
        self.segments().collect()
    }

    /// Recovers the dotted path (and kind) from a relative source-file path.
    ///
    /// `pkg/sub/__init__.py` maps to the package `pkg.sub`; `pkg/mod.py`
    /// maps to the file module `pkg.mod`. Anything else is an error.
    pub fn from_fs_path(path: &Path) -> PymodResult<(Self, ModuleKind)> {
        let mut segments: Vec<&str> = Vec::new();

        for component in path.components() {
            let part = match component {
                Component::Normal(part) => part.to_str().ok_or_else(|| {
                    PymodError::InvalidModulePath(format!("non-UTF-8 path {}", path.display()))
                })?,
                Component::CurDir => continue,
                _ => {
                    return Err(PymodError::InvalidModulePath(format!(
                        "unexpected component in {}",
                        path.display()
                    )))
                }
            };

            if part == "__init__.py" {
                return Ok((Self::new(&segments.join("."))?, ModuleKind::Package));
            }

            if let Some(stem) = part.strip_suffix(".py") {
                segments.push(stem);
                return Ok((Self::new(&segments.join("."))?, ModuleKind::File));
            }

            segments.push(part);
        }

        Err(PymodError::InvalidModulePath(format!(
            "{} is not a Python source path",
            path.display()
        )))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
