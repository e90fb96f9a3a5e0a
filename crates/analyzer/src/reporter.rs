//! Terminal rendering for module trees, search results, and the
//! toolchain check report.

use crate::query::Match;
use crate::tree::ModuleNode;
use owo_colors::{OwoColorize, Style};
use pymod_core::types::{DefKind, ModuleKind};
use pymod_provider::toolchain::{ProjectMeta, ToolStatus};

/// Style table for report rendering. `plain()` keeps output free of
/// escape sequences, for tests and non-tty consumers.
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    pub package: Style,
    pub file: Style,
    pub header: Style,
    pub ok: Style,
    pub err: Style,
    pub code: Style,
}

impl Styles {
    pub fn colored() -> Self {
        Self {
            package: Style::new().blue().bold(),
            file: Style::new().green(),
            header: Style::new().yellow().bold(),
            ok: Style::new().green(),
            err: Style::new().red(),
            code: Style::new().dimmed(),
        }
    }

    pub fn plain() -> Self {
        Self {
            package: Style::new(),
            file: Style::new(),
            header: Style::new(),
            ok: Style::new(),
            err: Style::new(),
            code: Style::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tree view
// ---------------------------------------------------------------------------

/// Renders a module tree, one node per line. With `show_code`, each
/// module's reconstructed definition lines follow it, indented.
pub fn render_tree(node: &ModuleNode, show_code: bool, styles: &Styles) -> String {
    let mut out = String::new();
    tree_node(node, "", show_code, styles, &mut out);
    out
}

fn tree_node(node: &ModuleNode, prefix: &str, show_code: bool, styles: &Styles, out: &mut String) {
    let name = node.path.last_segment();
    let label = match node.kind {
        ModuleKind::Package => name.style(styles.package).to_string(),
        ModuleKind::File => name.style(styles.file).to_string(),
    };
    out.push_str(prefix);
    out.push_str("│── ");
    out.push_str(&label);
    out.push('\n');

    let inner = format!("{prefix}│   ");

    if show_code {
        for variable in &node.variables {
            out.push_str(&inner);
            out.push_str(&variable.render().style(styles.code).to_string());
            out.push('\n');
        }
        for function in &node.functions {
            out.push_str(&inner);
            out.push_str(&function.signature().style(styles.code).to_string());
            out.push('\n');
        }
        for class in &node.classes {
            for line in class.render().lines() {
                out.push_str(&inner);
                out.push_str(&line.style(styles.code).to_string());
                out.push('\n');
            }
        }
    }

    for child in &node.children {
        tree_node(child, &inner, show_code, styles, out);
    }
}

// ---------------------------------------------------------------------------
// Search view
// ---------------------------------------------------------------------------

/// Renders search hits under a header naming the query and search root.
/// Empty result sets render nothing.
pub fn render_matches(query: &str, root: &str, matches: &[Match], styles: &Styles) -> String {
    if matches.is_empty() {
        return String::new();
    }

    let mut out = format!(
        "{}\n",
        format!("Searching for [{query}] in {root}").style(styles.header)
    );

    let mut current_module: Option<&str> = None;
    for hit in matches {
        if current_module != Some(hit.module.as_str()) {
            current_module = Some(hit.module.as_str());
            out.push_str(&format!(
                "│── {}\n",
                hit.module.as_str().style(styles.package)
            ));
        }

        let owner = match (&hit.kind, &hit.class) {
            (DefKind::Method, Some(class)) => format!("{class}."),
            _ => String::new(),
        };
        out.push_str(&format!(
            "│   [{}] {owner}{}\n",
            hit.kind.as_str(),
            hit.signature.style(styles.code)
        ));
    }

    out
}

// ---------------------------------------------------------------------------
// Check view
// ---------------------------------------------------------------------------

/// Renders the toolchain check report: one line per probe, plus project
/// metadata when a `pyproject.toml` was found.
pub fn render_check(
    tools: &[ToolStatus],
    project: Option<&ProjectMeta>,
    styles: &Styles,
) -> String {
    let mut out = String::new();

    for tool in tools {
        let (mark, style) = if tool.available {
            ("ok", styles.ok)
        } else {
            ("missing", styles.err)
        };
        out.push_str(&format!(
            "{}: {} ({})\n",
            tool.name,
            mark.style(style),
            tool.version
        ));
    }

    match project {
        Some(meta) => out.push_str(&format!(
            "pyproject: {} {} ({} dependencies)\n",
            meta.name, meta.version, meta.dependency_count
        )),
        None => out.push_str("pyproject: not found\n"),
    }

    out
}
