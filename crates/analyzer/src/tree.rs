//! Recursive module tree loading.
//!
//! A tree is rooted at one module; package nodes recurse into the file
//! modules and nested packages directly inside their directory. Children
//! of one package are parsed in parallel.

use pymod_core::error::PymodResult;
use pymod_core::path::ModulePath;
use pymod_core::types::{Class, Function, ModuleKind, Variable};
use pymod_provider::{parser, walker};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One module in the tree, with its parsed definitions and children.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    pub path: ModulePath,
    pub kind: ModuleKind,
    /// Absolute (root-joined) path of the module's source file.
    pub file: PathBuf,
    pub classes: Vec<Class>,
    pub functions: Vec<Function>,
    pub variables: Vec<Variable>,
    pub children: Vec<ModuleNode>,
}

impl ModuleNode {
    /// Loads `module` beneath `root`, recursing into package children.
    ///
    /// Parsing is lenient: a child file with a syntax error degrades to an
    /// empty node instead of failing the whole tree.
    pub fn load(root: &Path, module: &ModulePath, kind: ModuleKind) -> PymodResult<Self> {
        let file = root.join(module.to_fs_path(kind));
        let parsed = parser::parse_source_lenient(&file)?;

        let children = match kind {
            ModuleKind::File => Vec::new(),
            ModuleKind::Package => Self::load_children(root, module)?,
        };

        tracing::debug!(
            module = %module,
            kind = kind.as_str(),
            children = children.len(),
            "loaded module"
        );

        Ok(Self {
            path: module.clone(),
            kind,
            file,
            classes: parsed.classes,
            functions: parsed.functions,
            variables: parsed.variables,
            children,
        })
    }

    /// Loads every top-level module beneath `root`.
    pub fn load_top_level(root: &Path) -> PymodResult<Vec<Self>> {
        walker::top_level_modules(root)?
            .iter()
            .map(|(module, kind)| Self::load(root, module, *kind))
            .collect()
    }

    fn load_children(root: &Path, module: &ModulePath) -> PymodResult<Vec<Self>> {
        let dir = root.join(module.to_dir_path());
        let mut specs: Vec<(ModulePath, ModuleKind)> = Vec::new();

        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if file_type.is_file() {
                if let Some(stem) = name.strip_suffix(".py") {
                    if stem != "__init__" {
                        specs.push((module.join(stem)?, ModuleKind::File));
                    }
                }
            } else if file_type.is_dir() && entry.path().join("__init__.py").is_file() {
                specs.push((module.join(&name)?, ModuleKind::Package));
            }
        }

        specs.sort();

        let results: Vec<PymodResult<ModuleNode>> = specs
            .par_iter()
            .map(|(child, child_kind)| Self::load(root, child, *child_kind))
            .collect();

        let mut children = Vec::with_capacity(results.len());
        for result in results {
            children.push(result?);
        }
        Ok(children)
    }

    /// Total definitions in this node and its subtree.
    pub fn definition_count(&self) -> usize {
        let own = self.classes.len() + self.functions.len() + self.variables.len();
        own + self
            .children
            .iter()
            .map(ModuleNode::definition_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn loads_package_with_children() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("pkg/__init__.py"), "VERSION = \"1.0\"\n");
        write(&root.join("pkg/util.py"), "def helper(a, *, b=1):\n    pass\n");
        write(&root.join("pkg/sub/__init__.py"), "");
        write(&root.join("pkg/sub/leaf.py"), "class Leaf:\n    pass\n");

        let module = ModulePath::new("pkg").unwrap();
        let tree = ModuleNode::load(root, &module, ModuleKind::Package).unwrap();

        assert_eq!(tree.variables.len(), 1);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].path.as_str(), "pkg.sub");
        assert_eq!(tree.children[0].kind, ModuleKind::Package);
        assert_eq!(tree.children[0].children.len(), 1);
        assert_eq!(tree.children[1].path.as_str(), "pkg.util");
        assert_eq!(tree.children[1].functions.len(), 1);
        assert_eq!(tree.definition_count(), 4);
    }

    #[test]
    fn broken_child_degrades_to_empty_node() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("pkg/__init__.py"), "");
        write(&root.join("pkg/good.py"), "def fine():\n    pass\n");
        write(&root.join("pkg/bad.py"), "def broken(:\n");

        let module = ModulePath::new("pkg").unwrap();
        let tree = ModuleNode::load(root, &module, ModuleKind::Package).unwrap();

        assert_eq!(tree.children.len(), 2);
        let bad = &tree.children[0];
        assert_eq!(bad.path.as_str(), "pkg.bad");
        assert_eq!(bad.definition_count(), 0);
        assert_eq!(tree.definition_count(), 1);
    }

    #[test]
    fn loads_top_level_modules() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("alone.py"), "x = 1\n");
        write(&root.join("pkg/__init__.py"), "");
        write(&root.join("pkg/member.py"), "y = 2\n");

        let trees = ModuleNode::load_top_level(root).unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].path.as_str(), "alone");
        assert_eq!(trees[1].path.as_str(), "pkg");
        assert_eq!(trees[1].children.len(), 1);
    }
}
