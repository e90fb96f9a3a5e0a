//! `.py` file discovery beneath a project root.

use pymod_core::error::PymodResult;
use pymod_core::path::ModulePath;
use pymod_core::types::ModuleKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Iterates every `.py` file beneath `root`, optionally capped at
/// `max_depth` directory levels. Symlinks are followed; unreadable
/// entries are skipped.
pub fn python_files(root: &Path, max_depth: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut walk = WalkDir::new(root).follow_links(true);
    if let Some(depth) = max_depth {
        walk = walk.max_depth(depth);
    }

    walk.into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map_or(false, |extension| extension == "py")
        })
        .map(|entry| entry.into_path())
}

/// Enumerates the top-level modules of a project: `root/x.py` file modules
/// and `root/pkg/__init__.py` packages, sorted by dotted path.
pub fn top_level_modules(root: &Path) -> PymodResult<Vec<(ModulePath, ModuleKind)>> {
    let mut modules = Vec::new();

    for file in python_files(root, Some(2)) {
        let relative = match file.strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };

        let depth = relative.components().count();
        let is_init = relative
            .file_name()
            .map_or(false, |name| name == "__init__.py");

        // Depth 1: a plain file module. Depth 2: only a package's
        // __init__.py counts; other nested files belong to that package.
        let keep = (depth == 1 && !is_init) || (depth == 2 && is_init);
        if !keep {
            continue;
        }

        match ModulePath::from_fs_path(relative) {
            Ok(entry) => modules.push(entry),
            Err(e) => {
                tracing::debug!(path = %relative.display(), error = %e, "not a module path");
            }
        }
    }

    modules.sort();
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn finds_python_files_and_honors_depth() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("top.py"));
        touch(&root.join("pkg/__init__.py"));
        touch(&root.join("pkg/deep/nested.py"));
        touch(&root.join("README.md"));

        let all: Vec<PathBuf> = python_files(root, None).collect();
        assert_eq!(all.len(), 3);

        let shallow: Vec<PathBuf> = python_files(root, Some(2)).collect();
        assert_eq!(shallow.len(), 2);
    }

    #[test]
    fn enumerates_top_level_modules() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("single.py"));
        touch(&root.join("pkg/__init__.py"));
        touch(&root.join("pkg/member.py"));
        touch(&root.join("noinit/orphan.py"));

        let modules = top_level_modules(root).unwrap();
        let names: Vec<(&str, ModuleKind)> = modules
            .iter()
            .map(|(path, kind)| (path.as_str(), *kind))
            .collect();

        // pkg/member.py belongs to pkg; noinit has no __init__.py.
        assert_eq!(
            names,
            vec![
                ("pkg", ModuleKind::Package),
                ("single", ModuleKind::File),
            ]
        );
    }
}
