//! Module moves and project-wide import rewriting.

use crate::walker;
use fs_extra::dir::{move_dir, CopyOptions};
use pymod_core::error::{PymodError, PymodResult};
use pymod_core::path::ModulePath;
use pymod_core::types::ModuleKind;
use regex::Regex;
use std::path::Path;

/// Probes the filesystem to determine how `module` is laid out.
pub fn detect_kind(root: &Path, module: &ModulePath) -> PymodResult<ModuleKind> {
    if root.join(module.to_fs_path(ModuleKind::File)).is_file() {
        Ok(ModuleKind::File)
    } else if root.join(module.to_fs_path(ModuleKind::Package)).is_file() {
        Ok(ModuleKind::Package)
    } else {
        Err(PymodError::InvalidModulePath(format!(
            "{module} not found under {}",
            root.display()
        )))
    }
}

/// Moves `from` to `to` on disk and rewrites every reference to it in the
/// project's `.py` files. Returns the detected kind of the moved module.
pub fn move_module(root: &Path, from: &ModulePath, to: &ModulePath) -> PymodResult<ModuleKind> {
    let kind = detect_kind(root, from)?;

    match kind {
        ModuleKind::File => {
            let src = root.join(from.to_fs_path(ModuleKind::File));
            let dst = root.join(to.to_fs_path(ModuleKind::File));
            if let Some(parent) = dst.parent() {
                std::fs::create_dir_all(parent)?;
            }
            tracing::debug!(from = %src.display(), to = %dst.display(), "renaming module file");
            std::fs::rename(&src, &dst)?;
        }
        ModuleKind::Package => {
            let src = root.join(from.to_dir_path());
            let dst = root.join(to.to_dir_path());
            std::fs::create_dir_all(&dst)?;
            tracing::debug!(from = %src.display(), to = %dst.display(), "moving package directory");
            move_dir(
                &src,
                &dst,
                &CopyOptions::default().content_only(true).overwrite(true),
            )
            .map_err(|e| {
                PymodError::Internal(format!("failed to move {}: {e}", src.display()))
            })?;
        }
    }

    let changed = rewrite_imports(root, from, to)?;
    tracing::info!(from = %from, to = %to, kind = kind.as_str(), files_rewritten = changed, "moved module");

    Ok(kind)
}

/// Rewrites references to `old` across every `.py` file beneath `root`.
/// Returns the number of files that changed.
pub fn rewrite_imports(root: &Path, old: &ModulePath, new: &ModulePath) -> PymodResult<usize> {
    let mut changed = 0usize;

    for file in walker::python_files(root, None) {
        let contents = std::fs::read_to_string(&file)?;
        let rewritten = rewrite_source(&contents, old.as_str(), new.as_str())?;
        if rewritten != contents {
            std::fs::write(&file, rewritten)?;
            changed += 1;
            tracing::debug!(file = %file.display(), "rewrote imports");
        }
    }

    Ok(changed)
}

/// Rewrites the three reference shapes in one source text:
/// `import old[.sub]`, `from old[.sub] import`, and `old.`-prefixed
/// attribute access.
pub fn rewrite_source(source: &str, old: &str, new: &str) -> PymodResult<String> {
    let old_pattern = regex::escape(old);

    let import_re = compile(&format!(r"import\s+{old_pattern}((?:\.\w+)+|\s|$)"))?;
    let mut out = import_re
        .replace_all(source, |caps: &regex::Captures<'_>| {
            format!("import {new}{}", &caps[1])
        })
        .into_owned();

    let from_re = compile(&format!(r"from\s+{old_pattern}((?:\.\w+)*)\s+import"))?;
    out = from_re
        .replace_all(&out, |caps: &regex::Captures<'_>| {
            format!("from {new}{} import", &caps[1])
        })
        .into_owned();

    let attr_re = compile(&format!(r"{old_pattern}\."))?;
    out = attr_re
        .replace_all(&out, format!("{new}.").as_str())
        .into_owned();

    Ok(out)
}

fn compile(pattern: &str) -> PymodResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| PymodError::Internal(format!("invalid rewrite pattern: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_every_reference_shape() {
        let source = "from tests.test_mv import *\n\
                      import tests.test_mv.abc as abc\n\
                      test_var:tests.test_mv.abc.ABC = tests.test_mv.abc.ABC()";

        let rewritten = rewrite_source(source, "tests.test_mv", "tests.test_mv2").unwrap();
        assert_eq!(
            rewritten,
            "from tests.test_mv2 import *\n\
             import tests.test_mv2.abc as abc\n\
             test_var:tests.test_mv2.abc.ABC = tests.test_mv2.abc.ABC()"
        );

        // Moving back restores the original text.
        let restored = rewrite_source(&rewritten, "tests.test_mv2", "tests.test_mv").unwrap();
        assert_eq!(restored, source);
    }

    #[test]
    fn keeps_deep_from_import_tails() {
        let rewritten =
            rewrite_source("from old.a.b import thing\n", "old", "new").unwrap();
        assert_eq!(rewritten, "from new.a.b import thing\n");
    }

    #[test]
    fn plain_import_at_end_of_input() {
        let rewritten = rewrite_source("import old", "old", "new").unwrap();
        assert_eq!(rewritten, "import new");
    }

    #[test]
    fn does_not_touch_longer_names() {
        let source = "import oldish\nfrom oldish import x\noldish.y\n";
        assert_eq!(rewrite_source(source, "old", "new").unwrap(), source);
    }

    #[test]
    fn moves_file_module_and_rewrites_referents() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("tests")).unwrap();
        std::fs::write(root.join("tests/target.py"), "x = 1\n").unwrap();
        std::fs::write(
            root.join("tests/consumer.py"),
            "from tests.target import x\nimport tests.target\n",
        )
        .unwrap();

        let from = ModulePath::new("tests.target").unwrap();
        let to = ModulePath::new("tests.renamed").unwrap();
        let kind = move_module(root, &from, &to).unwrap();

        assert_eq!(kind, ModuleKind::File);
        assert!(!root.join("tests/target.py").exists());
        assert!(root.join("tests/renamed.py").exists());
        assert_eq!(
            std::fs::read_to_string(root.join("tests/consumer.py")).unwrap(),
            "from tests.renamed import x\nimport tests.renamed\n"
        );
    }

    #[test]
    fn moves_package_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("pkg/inner")).unwrap();
        std::fs::write(root.join("pkg/inner/__init__.py"), "").unwrap();
        std::fs::write(root.join("pkg/inner/leaf.py"), "x = 1\n").unwrap();
        std::fs::write(root.join("pkg/__init__.py"), "").unwrap();

        let from = ModulePath::new("pkg.inner").unwrap();
        let to = ModulePath::new("pkg.moved").unwrap();
        let kind = move_module(root, &from, &to).unwrap();

        assert_eq!(kind, ModuleKind::Package);
        assert!(!root.join("pkg/inner").exists());
        assert!(root.join("pkg/moved/__init__.py").exists());
        assert!(root.join("pkg/moved/leaf.py").exists());
    }

    #[test]
    fn missing_module_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let from = ModulePath::new("ghost").unwrap();
        let to = ModulePath::new("anywhere").unwrap();
        assert!(move_module(dir.path(), &from, &to).is_err());
    }
}
