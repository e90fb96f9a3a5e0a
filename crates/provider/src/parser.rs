//! Python source parsing via `rustpython-parser`.
//!
//! Turns a source file into the core definition model. Only top-level
//! statements are walked: function and class definitions, plain and
//! annotated assignments. Annotations, defaults, and values are sliced
//! verbatim from the source text by AST range.

use pymod_core::error::{PymodError, PymodResult};
use pymod_core::types::{Class, Function, Param, ParamKind, Variable};
use rustpython_parser::ast::{
    Arg, ArgWithDefault, Expr, Ranged, Stmt, StmtAnnAssign, StmtAssign, StmtClassDef,
};
use rustpython_parser::{ast, Parse};
use smallvec::SmallVec;
use std::path::Path;

/// Top-level definitions recovered from one source file.
#[derive(Debug, Clone, Default)]
pub struct ParsedModule {
    pub classes: Vec<Class>,
    pub functions: Vec<Function>,
    pub variables: Vec<Variable>,
}

impl ParsedModule {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty() && self.variables.is_empty()
    }
}

/// Parses a Python file into its top-level definition model.
pub fn parse_source(path: &Path) -> PymodResult<ParsedModule> {
    let source = std::fs::read_to_string(path)?;
    parse_str(&source, &path.display().to_string())
}

/// Like [`parse_source`], but a syntax error degrades to an empty module
/// with a warning, so one broken file does not abort a whole-tree walk.
pub fn parse_source_lenient(path: &Path) -> PymodResult<ParsedModule> {
    match parse_source(path) {
        Ok(parsed) => Ok(parsed),
        Err(PymodError::Parse { path, message }) => {
            tracing::warn!(path, message, "skipping unparsable module");
            Ok(ParsedModule::default())
        }
        Err(e) => Err(e),
    }
}

/// Parses in-memory source. `origin` is used for error reporting only.
pub fn parse_str(source: &str, origin: &str) -> PymodResult<ParsedModule> {
    let suite = ast::Suite::parse(source, origin).map_err(|e| PymodError::Parse {
        path: origin.to_owned(),
        message: e.to_string(),
    })?;

    let mut parsed = ParsedModule::default();

    for stmt in &suite {
        match stmt {
            Stmt::FunctionDef(f) => parsed.functions.push(function(
                f.name.as_str(),
                &f.args,
                f.returns.as_deref(),
                source,
                false,
            )),
            Stmt::AsyncFunctionDef(f) => parsed.functions.push(function(
                f.name.as_str(),
                &f.args,
                f.returns.as_deref(),
                source,
                true,
            )),
            Stmt::ClassDef(c) => parsed.classes.push(class_def(c, source)),
            Stmt::Assign(a) => parsed.variables.extend(assign(a, source)),
            Stmt::AnnAssign(a) => parsed.variables.extend(ann_assign(a, source)),
            _ => {}
        }
    }

    tracing::debug!(
        origin,
        classes = parsed.classes.len(),
        functions = parsed.functions.len(),
        variables = parsed.variables.len(),
        "parsed module"
    );

    Ok(parsed)
}

/// Verbatim source text covered by an AST node.
fn text<'a>(source: &'a str, node: &impl Ranged) -> &'a str {
    &source[node.range()]
}

fn function(
    name: &str,
    args: &ast::Arguments,
    returns: Option<&Expr>,
    source: &str,
    is_async: bool,
) -> Function {
    let mut params: SmallVec<[Param; 8]> = SmallVec::new();

    // Positional-only params collapse into Positional; the `/` marker
    // itself is not preserved.
    for arg in args.posonlyargs.iter().chain(&args.args) {
        params.push(defaulted_param(arg, source, ParamKind::Positional));
    }
    if let Some(vararg) = &args.vararg {
        params.push(bare_param(vararg, source, ParamKind::VarPositional));
    }
    for arg in &args.kwonlyargs {
        params.push(defaulted_param(arg, source, ParamKind::KeywordOnly));
    }
    if let Some(kwarg) = &args.kwarg {
        params.push(bare_param(kwarg, source, ParamKind::VarKeyword));
    }

    let returns = returns.map(|r| text(source, r).trim().trim_end_matches(':').to_owned());

    Function {
        name: name.to_owned(),
        params,
        returns,
        is_async,
    }
}

fn defaulted_param(arg: &ArgWithDefault, source: &str, kind: ParamKind) -> Param {
    Param {
        name: arg.def.arg.to_string(),
        annotation: arg
            .def
            .annotation
            .as_deref()
            .map(|a| text(source, a).to_owned()),
        default: arg.default.as_deref().map(|d| text(source, d).to_owned()),
        kind,
    }
}

/// `*args` / `**kwargs` never carry defaults.
fn bare_param(arg: &Arg, source: &str, kind: ParamKind) -> Param {
    Param {
        name: arg.arg.to_string(),
        annotation: arg.annotation.as_deref().map(|a| text(source, a).to_owned()),
        default: None,
        kind,
    }
}

fn class_def(class: &StmtClassDef, source: &str) -> Class {
    let bases = class
        .bases
        .iter()
        .map(|b| text(source, b).to_owned())
        .collect();

    let mut methods = Vec::new();
    for stmt in &class.body {
        match stmt {
            Stmt::FunctionDef(f) => methods.push(function(
                f.name.as_str(),
                &f.args,
                f.returns.as_deref(),
                source,
                false,
            )),
            Stmt::AsyncFunctionDef(f) => methods.push(function(
                f.name.as_str(),
                &f.args,
                f.returns.as_deref(),
                source,
                true,
            )),
            _ => {}
        }
    }

    Class {
        name: class.name.to_string(),
        bases,
        methods,
    }
}

/// One [`Variable`] per `Name` target; tuple and attribute targets are
/// skipped.
fn assign(stmt: &StmtAssign, source: &str) -> Vec<Variable> {
    let value = text(source, stmt.value.as_ref()).to_owned();

    stmt.targets
        .iter()
        .filter_map(|target| match target {
            Expr::Name(name) => Some(Variable {
                name: name.id.to_string(),
                annotation: None,
                value: Some(value.clone()),
            }),
            _ => None,
        })
        .collect()
}

fn ann_assign(stmt: &StmtAnnAssign, source: &str) -> Option<Variable> {
    match stmt.target.as_ref() {
        Expr::Name(name) => Some(Variable {
            name: name.id.to_string(),
            annotation: Some(text(source, stmt.annotation.as_ref()).to_owned()),
            value: stmt.value.as_deref().map(|v| text(source, v).to_owned()),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"import random

def test_function(a, b: str, c: int = 3, *args, **kwargs) -> random.Random:
    return random.Random()


def test_function2(a, b: str, *, d: int):
    return random.Random()


def test_function3(*kwoargs, case_sen=False):
    return random.Random()


class TestClass(random.Random):
    def test_method(self, a: int = 1, *, b: str = 2) -> random.Random:
        return random.Random()


class TestClass2(random.Random):
    def __init__(self):
        pass


test_var: str = 1
test_var2 = 2
TEST_CONST = test_function(1, "2")
"#;

    fn parse_fixture() -> ParsedModule {
        parse_str(FIXTURE, "test_module.py").unwrap()
    }

    #[test]
    fn recovers_all_top_level_definitions() {
        let parsed = parse_fixture();
        assert_eq!(parsed.functions.len(), 3);
        assert_eq!(parsed.classes.len(), 2);
        assert_eq!(parsed.variables.len(), 3);
    }

    #[test]
    fn recovers_parameter_kinds_defaults_and_annotations() {
        let parsed = parse_fixture();

        let f = &parsed.functions[0];
        assert_eq!(f.name, "test_function");
        assert!(!f.is_async);
        assert_eq!(f.returns.as_deref(), Some("random.Random"));

        let kinds: Vec<ParamKind> = f.params.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParamKind::Positional,
                ParamKind::Positional,
                ParamKind::Positional,
                ParamKind::VarPositional,
                ParamKind::VarKeyword,
            ]
        );
        assert_eq!(f.params[0].name, "a");
        assert_eq!(f.params[0].annotation, None);
        assert_eq!(f.params[1].annotation.as_deref(), Some("str"));
        assert_eq!(f.params[2].annotation.as_deref(), Some("int"));
        assert_eq!(f.params[2].default.as_deref(), Some("3"));
        assert_eq!(f.params[3].name, "args");
        assert_eq!(f.params[4].name, "kwargs");
    }

    #[test]
    fn recovers_keyword_only_parameters() {
        let parsed = parse_fixture();

        let f = &parsed.functions[1];
        assert_eq!(f.name, "test_function2");
        assert_eq!(f.returns, None);
        assert_eq!(f.params[2].name, "d");
        assert_eq!(f.params[2].kind, ParamKind::KeywordOnly);
        assert_eq!(f.params[2].annotation.as_deref(), Some("int"));

        let f = &parsed.functions[2];
        assert_eq!(f.name, "test_function3");
        assert_eq!(f.params[0].name, "kwoargs");
        assert_eq!(f.params[0].kind, ParamKind::VarPositional);
        assert_eq!(f.params[1].name, "case_sen");
        assert_eq!(f.params[1].kind, ParamKind::KeywordOnly);
        assert_eq!(f.params[1].default.as_deref(), Some("False"));
    }

    #[test]
    fn recovers_classes_with_bases_and_methods() {
        let parsed = parse_fixture();

        let class = &parsed.classes[0];
        assert_eq!(class.name, "TestClass");
        assert_eq!(class.bases, vec!["random.Random".to_owned()]);
        assert_eq!(class.methods.len(), 1);

        let method = &class.methods[0];
        assert_eq!(method.name, "test_method");
        assert_eq!(method.params[0].name, "self");
        assert_eq!(method.params[1].default.as_deref(), Some("1"));
        assert_eq!(method.params[2].kind, ParamKind::KeywordOnly);
        assert_eq!(method.params[2].default.as_deref(), Some("2"));
        assert_eq!(method.returns.as_deref(), Some("random.Random"));

        let class = &parsed.classes[1];
        assert_eq!(class.name, "TestClass2");
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].name, "__init__");
        assert!(class.methods[0].params[1..].is_empty());
    }

    #[test]
    fn recovers_module_variables() {
        let parsed = parse_fixture();

        assert_eq!(parsed.variables[0].name, "test_var");
        assert_eq!(parsed.variables[0].annotation.as_deref(), Some("str"));
        assert_eq!(parsed.variables[0].value.as_deref(), Some("1"));

        assert_eq!(parsed.variables[1].name, "test_var2");
        assert_eq!(parsed.variables[1].annotation, None);
        assert_eq!(parsed.variables[1].value.as_deref(), Some("2"));

        assert_eq!(parsed.variables[2].name, "TEST_CONST");
        assert_eq!(
            parsed.variables[2].value.as_deref(),
            Some("test_function(1, \"2\")")
        );
    }

    #[test]
    fn signatures_round_trip_through_the_model() {
        let parsed = parse_fixture();

        assert_eq!(
            parsed.functions[0].signature(),
            "def test_function(a, b: str, c: int = 3, *args, **kwargs) -> random.Random:"
        );
        assert_eq!(
            parsed.functions[1].signature(),
            "def test_function2(a, b: str, *, d: int):"
        );
        assert_eq!(
            parsed.functions[2].signature(),
            "def test_function3(*kwoargs, case_sen=False):"
        );
        assert_eq!(
            parsed.classes[0].methods[0].signature(),
            "def test_method(self, a: int = 1, *, b: str = 2) -> random.Random:"
        );
    }

    #[test]
    fn async_functions_are_flagged() {
        let parsed = parse_str(
            "async def fetch(url: str, *, timeout: float = 1.0):\n    pass\n",
            "async.py",
        )
        .unwrap();
        let f = &parsed.functions[0];
        assert!(f.is_async);
        assert_eq!(
            f.signature(),
            "async def fetch(url: str, *, timeout: float = 1.0):"
        );
    }

    #[test]
    fn multi_target_assignment_fans_out() {
        let parsed = parse_str("a = b = 3\n", "multi.py").unwrap();
        assert_eq!(parsed.variables.len(), 2);
        assert_eq!(parsed.variables[0].name, "a");
        assert_eq!(parsed.variables[1].name, "b");
        assert_eq!(parsed.variables[1].value.as_deref(), Some("3"));
    }

    #[test]
    fn annotated_declaration_without_value() {
        let parsed = parse_str("slot: int\n", "decl.py").unwrap();
        assert_eq!(parsed.variables[0].annotation.as_deref(), Some("int"));
        assert_eq!(parsed.variables[0].value, None);
    }

    #[test]
    fn nested_definitions_are_not_walked() {
        let parsed = parse_str(
            "def outer():\n    def inner():\n        pass\n    x = 1\n",
            "nested.py",
        )
        .unwrap();
        assert_eq!(parsed.functions.len(), 1);
        assert!(parsed.variables.is_empty());
    }

    #[test]
    fn syntax_error_is_a_parse_error() {
        let err = parse_str("def broken(:\n", "broken.py").unwrap_err();
        assert!(matches!(err, PymodError::Parse { .. }));
    }

    #[test]
    fn lenient_parse_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.py");
        std::fs::write(&path, "def broken(:\n").unwrap();

        let parsed = parse_source_lenient(&path).unwrap();
        assert!(parsed.is_empty());
    }
}
