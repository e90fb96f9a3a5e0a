//! Definition search over a module tree.

use crate::tree::ModuleNode;
use pymod_core::path::ModulePath;
use pymod_core::types::DefKind;

/// Which definition kinds to search. All-false selects everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector {
    pub functions: bool,
    pub classes: bool,
    pub variables: bool,
}

impl Selector {
    fn effective(self) -> (bool, bool, bool) {
        if !self.functions && !self.classes && !self.variables {
            (true, true, true)
        } else {
            (self.functions, self.classes, self.variables)
        }
    }
}

/// One search hit.
#[derive(Debug, Clone)]
pub struct Match {
    pub module: ModulePath,
    pub kind: DefKind,
    pub name: String,
    /// Owning class for methods.
    pub class: Option<String>,
    /// Reconstructed definition line.
    pub signature: String,
}

/// Case-insensitive substring search across the tree.
///
/// Selecting functions also searches class methods; a matching method
/// reports its owning class.
pub fn find(node: &ModuleNode, query: &str, selector: Selector) -> Vec<Match> {
    let needle = query.to_lowercase();
    let (functions, classes, variables) = selector.effective();

    let mut matches = Vec::new();
    collect(node, &needle, functions, classes, variables, &mut matches);

    tracing::debug!(query, matches = matches.len(), "search complete");
    matches
}

fn collect(
    node: &ModuleNode,
    needle: &str,
    functions: bool,
    classes: bool,
    variables: bool,
    matches: &mut Vec<Match>,
) {
    if variables {
        for variable in &node.variables {
            if hit(&variable.name, needle) {
                matches.push(Match {
                    module: node.path.clone(),
                    kind: DefKind::Variable,
                    name: variable.name.clone(),
                    class: None,
                    signature: variable.render(),
                });
            }
        }
    }

    if functions {
        for function in &node.functions {
            if hit(&function.name, needle) {
                matches.push(Match {
                    module: node.path.clone(),
                    kind: DefKind::Function,
                    name: function.name.clone(),
                    class: None,
                    signature: function.signature(),
                });
            }
        }
    }

    for class in &node.classes {
        if classes && hit(&class.name, needle) {
            matches.push(Match {
                module: node.path.clone(),
                kind: DefKind::Class,
                name: class.name.clone(),
                class: None,
                signature: class.signature(),
            });
        }

        if functions {
            for method in &class.methods {
                if hit(&method.name, needle) {
                    matches.push(Match {
                        module: node.path.clone(),
                        kind: DefKind::Method,
                        name: method.name.clone(),
                        class: Some(class.name.clone()),
                        signature: method.signature(),
                    });
                }
            }
        }
    }

    for child in &node.children {
        collect(child, needle, functions, classes, variables, matches);
    }
}

fn hit(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}
