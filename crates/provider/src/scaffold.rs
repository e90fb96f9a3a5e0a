//! Module scaffolding -- creating module files and package skeletons.

use pymod_core::error::{PymodError, PymodResult};
use pymod_core::path::ModulePath;
use pymod_core::types::ModuleKind;
use std::path::{Path, PathBuf};

/// Creates `module` beneath `root` and returns the created source path.
///
/// Parent directories are created as needed. The operation is idempotent:
/// an existing module file is left untouched.
pub fn create_module(root: &Path, module: &ModulePath, kind: ModuleKind) -> PymodResult<PathBuf> {
    let path = root.join(module.to_fs_path(kind));

    if path.exists() {
        tracing::info!(module = %module, path = %path.display(), "module already exists");
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::File::create(&path)?;

    tracing::info!(module = %module, kind = kind.as_str(), path = %path.display(), "created module");
    Ok(path)
}

/// Creates `child` inside the package `parent`.
///
/// File modules cannot contain other modules.
pub fn add_submodule(
    root: &Path,
    parent: &ModulePath,
    parent_kind: ModuleKind,
    child: &str,
    child_kind: ModuleKind,
) -> PymodResult<PathBuf> {
    if parent_kind == ModuleKind::File {
        return Err(PymodError::Unsupported(format!(
            "file module {parent} cannot contain submodules"
        )));
    }

    create_module(root, &parent.join(child)?, child_kind)
}
