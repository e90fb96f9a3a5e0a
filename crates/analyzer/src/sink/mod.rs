//! Machine-readable output for tooling consumers.
//!
//! Three row schemas:
//! - [`ModuleRow`] -- one per module in a tree
//! - [`DefinitionRow`] -- one per recovered definition (denormalized)
//! - [`ParamRow`] -- one per declared parameter
//!
//! Rows stream as NDJSON through [`json_stream::JsonStreamSink`].

pub mod json_stream;

use crate::query::Match;
use crate::tree::ModuleNode;
use pymod_core::types::{Class, DefKind, Function};
use serde::Serialize;

/// One row per module -- kind plus definition counts.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRow {
    pub module: String,
    /// "file" | "package"
    pub kind: &'static str,
    pub file: String,
    pub classes: u32,
    pub functions: u32,
    pub variables: u32,
}

/// One row per recovered definition -- fully denormalized.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionRow {
    pub module: String,
    /// "function" | "class" | "method" | "variable"
    pub kind: &'static str,
    pub name: String,
    /// Owning class for methods, empty otherwise.
    pub class: String,
    pub signature: String,
    pub is_async: bool,
    pub bases: Vec<String>,
}

/// One row per declared parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamRow {
    pub module: String,
    pub function: String,
    /// Owning class for method parameters, empty otherwise.
    pub class: String,
    pub name: String,
    /// "positional" | "keyword_only" | "var_positional" | "var_keyword"
    pub kind: &'static str,
    pub annotation: Option<String>,
    pub default: Option<String>,
}

/// All rows produced from one module tree.
#[derive(Debug, Clone, Default)]
pub struct TreeRows {
    pub modules: Vec<ModuleRow>,
    pub definitions: Vec<DefinitionRow>,
    pub params: Vec<ParamRow>,
}

/// Flattens a tree into its row representation.
pub fn collect_rows(node: &ModuleNode) -> TreeRows {
    let mut rows = TreeRows::default();
    collect_node(node, &mut rows);
    rows
}

fn collect_node(node: &ModuleNode, rows: &mut TreeRows) {
    let module = node.path.as_str().to_owned();

    rows.modules.push(ModuleRow {
        module: module.clone(),
        kind: node.kind.as_str(),
        file: node.file.display().to_string(),
        classes: node.classes.len() as u32,
        functions: node.functions.len() as u32,
        variables: node.variables.len() as u32,
    });

    for variable in &node.variables {
        rows.definitions.push(DefinitionRow {
            module: module.clone(),
            kind: DefKind::Variable.as_str(),
            name: variable.name.clone(),
            class: String::new(),
            signature: variable.render(),
            is_async: false,
            bases: Vec::new(),
        });
    }

    for function in &node.functions {
        push_function(&module, function, None, rows);
    }

    for class in &node.classes {
        push_class(&module, class, rows);
    }

    for child in &node.children {
        collect_node(child, rows);
    }
}

fn push_class(module: &str, class: &Class, rows: &mut TreeRows) {
    rows.definitions.push(DefinitionRow {
        module: module.to_owned(),
        kind: DefKind::Class.as_str(),
        name: class.name.clone(),
        class: String::new(),
        signature: class.signature(),
        is_async: false,
        bases: class.bases.clone(),
    });

    for method in &class.methods {
        push_function(module, method, Some(&class.name), rows);
    }
}

fn push_function(module: &str, function: &Function, class: Option<&str>, rows: &mut TreeRows) {
    let kind = match class {
        Some(_) => DefKind::Method,
        None => DefKind::Function,
    };

    rows.definitions.push(DefinitionRow {
        module: module.to_owned(),
        kind: kind.as_str(),
        name: function.name.clone(),
        class: class.unwrap_or_default().to_owned(),
        signature: function.signature(),
        is_async: function.is_async,
        bases: Vec::new(),
    });

    for param in &function.params {
        rows.params.push(ParamRow {
            module: module.to_owned(),
            function: function.name.clone(),
            class: class.unwrap_or_default().to_owned(),
            name: param.name.clone(),
            kind: param.kind.as_str(),
            annotation: param.annotation.clone(),
            default: param.default.clone(),
        });
    }
}

/// Converts search hits into definition rows (for `find --json`).
pub fn rows_for_matches(matches: &[Match]) -> Vec<DefinitionRow> {
    matches
        .iter()
        .map(|hit| DefinitionRow {
            module: hit.module.as_str().to_owned(),
            kind: hit.kind.as_str(),
            name: hit.name.clone(),
            class: hit.class.clone().unwrap_or_default(),
            signature: hit.signature.clone(),
            is_async: hit.signature.starts_with("async "),
            bases: Vec::new(),
        })
        .collect()
}
