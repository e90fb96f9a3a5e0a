//! Domain types for Python definitions recovered from source.
//!
//! Annotations, default values, assigned values, and base classes hold the
//! verbatim source text of the corresponding expression, sliced from the
//! original file -- never a re-serialization.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

/// How a module lives on disk: a single `.py` file, or a package directory
/// holding an `__init__.py`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    File,
    Package,
}

impl ModuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::File => "file",
            ModuleKind::Package => "package",
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// The binding kind of one declared parameter.
///
/// `VarPositional` is the single `*args`, `VarKeyword` the single
/// `**kwargs`. `KeywordOnly` parameters appear after `*args` or after a
/// bare `*` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    Positional,
    KeywordOnly,
    VarPositional,
    VarKeyword,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Positional => "positional",
            ParamKind::KeywordOnly => "keyword_only",
            ParamKind::VarPositional => "var_positional",
            ParamKind::VarKeyword => "var_keyword",
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub annotation: Option<String>,
    pub default: Option<String>,
    pub kind: ParamKind,
}

impl Param {
    /// Renders the parameter the way it appeared in the `def` line.
    ///
    /// Defaults follow PEP 8 spacing: `x: int = 3` when annotated,
    /// `x=3` when bare.
    pub fn render(&self) -> String {
        let mut out = String::new();

        match self.kind {
            ParamKind::VarPositional => out.push('*'),
            ParamKind::VarKeyword => out.push_str("**"),
            _ => {}
        }
        out.push_str(&self.name);

        if let Some(annotation) = &self.annotation {
            out.push_str(": ");
            out.push_str(annotation);
        }

        if let Some(default) = &self.default {
            if self.annotation.is_some() {
                out.push_str(" = ");
            } else {
                out.push('=');
            }
            out.push_str(default);
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A top-level function or a class method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Declaration order: positional, `*args`, keyword-only, `**kwargs`.
    pub params: SmallVec<[Param; 8]>,
    /// Verbatim return annotation, if any.
    pub returns: Option<String>,
    pub is_async: bool,
}

impl Function {
    /// Reconstructs the `def` line.
    ///
    /// A bare `*` separator is inserted before the first keyword-only
    /// parameter when the function has no `*args`, so the rendered
    /// signature preserves parameter kinds.
    pub fn signature(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.params.len() + 1);
        let mut star_seen = false;

        for param in &self.params {
            match param.kind {
                ParamKind::VarPositional => star_seen = true,
                ParamKind::KeywordOnly if !star_seen => {
                    parts.push("*".to_owned());
                    star_seen = true;
                }
                _ => {}
            }
            parts.push(param.render());
        }

        let mut out = String::new();
        if self.is_async {
            out.push_str("async ");
        }
        out.push_str("def ");
        out.push_str(&self.name);
        out.push('(');
        out.push_str(&parts.join(", "));
        out.push(')');
        if let Some(returns) = &self.returns {
            out.push_str(" -> ");
            out.push_str(returns);
        }
        out.push(':');
        out
    }
}

/// A top-level class with its method signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    /// Verbatim base-class expressions.
    pub bases: Vec<String>,
    pub methods: Vec<Function>,
}

impl Class {
    /// Reconstructs the `class` line.
    pub fn signature(&self) -> String {
        let mut out = String::from("class ");
        out.push_str(&self.name);
        if !self.bases.is_empty() {
            out.push('(');
            out.push_str(&self.bases.join(", "));
            out.push(')');
        }
        out.push(':');
        out
    }

    /// Class line plus indented method signatures.
    pub fn render(&self) -> String {
        let mut out = self.signature();
        for method in &self.methods {
            out.push_str("\n    ");
            out.push_str(&method.signature());
        }
        out
    }
}

/// A module-level variable binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub annotation: Option<String>,
    pub value: Option<String>,
}

impl Variable {
    /// Reconstructs the assignment line.
    pub fn render(&self) -> String {
        let mut out = self.name.clone();
        if let Some(annotation) = &self.annotation {
            out.push_str(": ");
            out.push_str(annotation);
        }
        if let Some(value) = &self.value {
            out.push_str(" = ");
            out.push_str(value);
        }
        out
    }
}

/// What a search hit or sink row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefKind {
    Function,
    Class,
    Method,
    Variable,
}

impl DefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DefKind::Function => "function",
            DefKind::Class => "class",
            DefKind::Method => "method",
            DefKind::Variable => "variable",
        }
    }
}
