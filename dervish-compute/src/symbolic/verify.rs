//! Detection of cyclic variable definitions.

use std::collections::HashMap;
use super::expr::Expr;

/// Checks whether defining a variable would make the set of definitions cyclic.
///
/// A definition such as `x := y + 1` is only safe if following the variables it refers to
/// never leads back to `x`.
#[derive(Debug, Clone, Copy)]
pub struct VariableVerifier<'a> {
    /// The definitions already in effect.
    existing: &'a HashMap<String, Expr>,
}

impl<'a> VariableVerifier<'a> {
    /// Creates a verifier for the given existing definitions.
    pub fn new(existing: &'a HashMap<String, Expr>) -> Self {
        Self { existing }
    }

    /// Returns true if binding `name` to `definition` would create a cycle, including the
    /// trivial cycle of a definition that refers to `name` itself.
    ///
    /// The existing definition of `name`, if any, is ignored, since it would be replaced.
    pub fn would_cycle(&self, name: &str, definition: &Expr) -> bool {
        let mut path = vec![name];
        self.visit(definition, &mut path)
    }

    /// Depth-first search through the variables of `expr`. `path` holds the names whose
    /// definitions are currently being expanded.
    fn visit<'b>(&'b self, expr: &'b Expr, path: &mut Vec<&'b str>) -> bool
    where
        'a: 'b,
    {
        for variable in expr.variables() {
            // the root is always on the path, so its old definition is never expanded
            if path.contains(&variable) {
                return true;
            }

            let Some(next) = self.existing.get(variable) else {
                continue;
            };

            path.push(variable);
            let cycle = self.visit(next, path);
            path.pop();
            if cycle {
                return true;
            }
        }
        false
    }
}
