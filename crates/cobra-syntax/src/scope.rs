//! Names that need a hoisted `var` declaration in a body.
//!
//! A scope belongs to the program top level or to one function body. Nested
//! function bodies are separate scopes and are collected on their own when
//! the writer reaches them.

use crate::ir::Stmt;

/// Ordered, deduplicated names bound directly in one body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    names: Vec<String>,
}

impl Scope {
    /// Collect the bindings of `body`, leaving out `params` of the owning
    /// function (they are already bound by the parameter list).
    pub fn collect(body: &[Stmt], params: &[String]) -> Self {
        let mut scope = Scope::default();
        scope.walk(body, params);
        tracing::trace!(names = ?scope.names, "collected scope");
        scope
    }

    /// Names in first-binding order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn walk(&mut self, body: &[Stmt], params: &[String]) {
        for stmt in body {
            match stmt {
                Stmt::Assign { target, .. } => self.bind(target, params),
                Stmt::MultiAssign { targets, .. } => {
                    for target in targets {
                        self.bind(target, params);
                    }
                }
                // The body is its own scope.
                Stmt::Function(f) => self.bind(&f.name, params),
                // Branch bodies bind in the enclosing function.
                Stmt::If(chain) => {
                    for branch in &chain.branches {
                        self.walk(&branch.body, params);
                    }
                    if let Some(orelse) = &chain.orelse {
                        self.walk(orelse, params);
                    }
                }
                Stmt::Return { .. } | Stmt::Expr { .. } => {}
            }
        }
    }

    fn bind(&mut self, name: &str, params: &[String]) {
        if params.iter().any(|p| p == name) || self.names.iter().any(|n| n == name) {
            return;
        }
        self.names.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::read_python;

    fn top_level(source: &str) -> Vec<String> {
        let program = read_python(source).expect("parse failed");
        Scope::collect(&program.body, &[]).names().to_vec()
    }

    #[test]
    fn test_first_seen_order_without_duplicates() {
        assert_eq!(
            top_level("b = 1\na = b\nb = 3\nc = a = 4\n"),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn test_function_name_binds_but_body_does_not() {
        let source = "def foo(a):\n    inner = a\n    return inner\nx = foo(1)\n";
        assert_eq!(top_level(source), vec!["foo", "x"]);
    }

    #[test]
    fn test_function_body_scope_excludes_params() {
        let program =
            read_python("def foo(a, b):\n    a = a + 1\n    c = b\n    return c\n").unwrap();
        let Stmt::Function(f) = &program.body[0] else {
            panic!("expected function");
        };
        let scope = Scope::collect(&f.body, &f.params);
        assert_eq!(scope.names(), ["c"]);
    }

    #[test]
    fn test_nested_function_is_independent() {
        let source = "def foo():\n    def bar():\n        y = 2\n        return y\n";
        let program = read_python(source).unwrap();
        let Stmt::Function(foo) = &program.body[0] else {
            panic!("expected function");
        };
        assert_eq!(Scope::collect(&foo.body, &foo.params).names(), ["bar"]);

        let Stmt::Function(bar) = &foo.body[0] else {
            panic!("expected nested function");
        };
        assert_eq!(Scope::collect(&bar.body, &bar.params).names(), ["y"]);
    }

    #[test]
    fn test_if_branches_bind_in_enclosing_scope() {
        let source = "if a:\n    x = 1\nelif b:\n    y = 2\nelse:\n    x = 3\n    z = 4\n";
        assert_eq!(top_level(source), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_expressions_bind_nothing() {
        let scope = Scope::collect(&read_python("foo(1)\n2 + 2\n").unwrap().body, &[]);
        assert!(scope.is_empty());
        assert!(Scope::collect(&[], &[]).is_empty());
    }
}
