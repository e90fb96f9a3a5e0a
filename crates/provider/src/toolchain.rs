//! Python toolchain probing and `pyproject.toml` metadata.

use pymod_core::error::{PymodError, PymodResult};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// Outcome of probing one external tool.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: &'static str,
    pub available: bool,
    /// Trimmed `--version` output, or the failure reason.
    pub version: String,
}

pub fn probe_python() -> ToolStatus {
    probe("python3")
}

pub fn probe_poetry() -> ToolStatus {
    probe("poetry")
}

fn probe(program: &'static str) -> ToolStatus {
    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => {
            // Some tools report the version on stderr.
            let mut version = String::from_utf8_lossy(&output.stdout).trim().to_owned();
            if version.is_empty() {
                version = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            }
            ToolStatus {
                name: program,
                available: true,
                version,
            }
        }
        Ok(output) => ToolStatus {
            name: program,
            available: false,
            version: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        },
        Err(e) => ToolStatus {
            name: program,
            available: false,
            version: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// pyproject.toml
// ---------------------------------------------------------------------------

/// Project metadata surfaced by the check report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMeta {
    pub name: String,
    pub version: String,
    pub dependency_count: usize,
}

#[derive(Debug, Deserialize)]
struct PyProject {
    project: Option<ProjectTable>,
    tool: Option<ToolTable>,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ToolTable {
    poetry: Option<PoetryTable>,
}

#[derive(Debug, Deserialize)]
struct PoetryTable {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    dependencies: toml::Table,
}

/// Reads `root/pyproject.toml`. Returns `Ok(None)` when the file is
/// absent; a present-but-invalid file is a toolchain error.
pub fn read_pyproject(root: &Path) -> PymodResult<Option<ProjectMeta>> {
    let path = root.join("pyproject.toml");
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let parsed: PyProject = toml::from_str(&contents)
        .map_err(|e| PymodError::Toolchain(format!("invalid pyproject.toml: {e}")))?;

    // PEP 621 [project] wins over the legacy [tool.poetry] table.
    if let Some(project) = parsed.project {
        return Ok(Some(ProjectMeta {
            name: project.name.unwrap_or_default(),
            version: project.version.unwrap_or_default(),
            dependency_count: project.dependencies.len(),
        }));
    }

    if let Some(poetry) = parsed.tool.and_then(|tool| tool.poetry) {
        return Ok(Some(ProjectMeta {
            name: poetry.name.unwrap_or_default(),
            version: poetry.version.unwrap_or_default(),
            dependency_count: poetry.dependencies.len(),
        }));
    }

    Ok(Some(ProjectMeta {
        name: String::new(),
        version: String::new(),
        dependency_count: 0,
    }))
}
