//! JavaScript writer for the syntax tree.
//!
//! Output format is fixed: four-space indentation, opening braces on the
//! line of the construct, one statement per line, no blank lines and no
//! trailing newline. Each program or function body starts with a `var`
//! declaration of the names its scope binds.

use crate::ir::*;
use crate::scope::Scope;
use crate::traits::Writer;

/// Static instance of the JavaScript writer.
pub static JAVASCRIPT_WRITER: JavaScriptWriterImpl = JavaScriptWriterImpl;

/// JavaScript writer implementing the Writer trait.
pub struct JavaScriptWriterImpl;

impl Writer for JavaScriptWriterImpl {
    fn language(&self) -> &'static str {
        "javascript"
    }

    fn extension(&self) -> &'static str {
        "js"
    }

    fn write(&self, program: &Program) -> String {
        JavaScriptWriter::emit(program)
    }
}

/// Emits the syntax tree as JavaScript source code.
pub struct JavaScriptWriter {
    output: String,
    indent: usize,
}

impl JavaScriptWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Emit a program to JavaScript source.
    pub fn emit(program: &Program) -> String {
        let mut writer = Self::new();
        writer.write_program(program);
        tracing::debug!(bytes = writer.output.len(), "emitted javascript");
        writer.output
    }

    fn write_program(&mut self, program: &Program) {
        let scope = Scope::collect(&program.body, &[]);
        self.write_body(&scope, &program.body);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Begin a new output line at the current indentation.
    fn start_line(&mut self) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.write_indent();
    }

    fn write_body(&mut self, scope: &Scope, body: &[Stmt]) {
        if !scope.is_empty() {
            self.start_line();
            self.output.push_str("var ");
            self.output.push_str(&scope.names().join(", "));
            self.output.push(';');
        }
        for stmt in body {
            self.start_line();
            self.write_stmt(stmt);
        }
    }

    /// `{`, the body one level deeper, then `}` on its own line.
    fn write_block(&mut self, scope: &Scope, body: &[Stmt]) {
        self.output.push('{');
        self.indent += 1;
        self.write_body(scope, body);
        self.indent -= 1;
        self.start_line();
        self.output.push('}');
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { target, value } => {
                self.output.push_str(target);
                self.output.push_str(" = ");
                self.write_expr(value);
                self.output.push(';');
            }

            Stmt::MultiAssign { targets, value } => {
                for target in targets {
                    self.output.push_str(target);
                    self.output.push_str(" = ");
                }
                self.write_expr(value);
                self.output.push(';');
            }

            // Declarations are assignments of a function expression.
            Stmt::Function(f) => {
                self.output.push_str(&f.name);
                self.output.push_str(" = ");
                self.write_params(&f.params);
                let scope = Scope::collect(&f.body, &f.params);
                self.write_block(&scope, &f.body);
                self.output.push(';');
            }

            Stmt::Return { value } => {
                self.output.push_str("return");
                if let Some(value) = value {
                    self.output.push(' ');
                    self.write_expr(value);
                }
                self.output.push(';');
            }

            Stmt::If(chain) => self.write_if(chain),

            Stmt::Expr { expr } => {
                self.write_expr(expr);
                self.output.push(';');
            }
        }
    }

    fn write_if(&mut self, chain: &IfChain) {
        // Branch bodies share the enclosing function's scope.
        let no_scope = Scope::default();
        for (i, branch) in chain.branches.iter().enumerate() {
            if i > 0 {
                self.output.push_str(" else ");
            }
            self.output.push_str("if (");
            self.write_expr(&branch.test);
            self.output.push_str(") ");
            self.write_block(&no_scope, &branch.body);
        }
        if let Some(orelse) = &chain.orelse {
            self.output.push_str(" else ");
            self.write_block(&no_scope, orelse);
        }
    }

    /// `function(a, b) ` up to the opening brace.
    fn write_params(&mut self, params: &[String]) {
        self.output.push_str("function(");
        self.output.push_str(&params.join(", "));
        self.output.push_str(") ");
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident { name } => self.output.push_str(name),
            Expr::Number { text } | Expr::String { text } => self.output.push_str(text),
            Expr::None => self.output.push_str("null"),
            Expr::Bool { value } => self.output.push_str(if *value { "true" } else { "false" }),

            Expr::Binary { left, op, right } => {
                self.write_expr(left);
                self.output.push(' ');
                self.output.push_str(binary_op(*op));
                self.output.push(' ');
                self.write_expr(right);
            }

            Expr::Unary { op, operand } => {
                match op {
                    UnaryOp::Not => self.output.push('!'),
                    UnaryOp::Neg => {
                        self.output.push('-');
                        // `--x` would read as a decrement.
                        if matches!(
                            operand.as_ref(),
                            Expr::Unary {
                                op: UnaryOp::Neg,
                                ..
                            }
                        ) {
                            self.output.push(' ');
                        }
                    }
                }
                self.write_expr(operand);
            }

            Expr::Call { callee, args } => {
                self.write_expr(callee);
                self.output.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(arg);
                }
                self.output.push(')');
            }

            Expr::Attribute { object, name } => {
                self.write_expr(object);
                self.output.push('.');
                self.output.push_str(name);
            }

            Expr::Index { object, index } => {
                self.write_expr(object);
                self.output.push('[');
                self.write_expr(index);
                self.output.push(']');
            }

            Expr::Lambda { params, body } => self.write_lambda(params, body),

            Expr::List { items } => {
                self.output.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.output.push(',');
                    }
                    self.write_expr(item);
                }
                self.output.push(']');
            }

            Expr::Dict { entries } => self.write_dict(entries),

            Expr::Grouped { inner } => {
                self.output.push('(');
                self.write_expr(inner);
                self.output.push(')');
            }
        }
    }

    /// A call body is run for its effect; any other body is returned.
    fn write_lambda(&mut self, params: &[String], body: &Expr) {
        self.write_params(params);
        self.output.push('{');
        self.indent += 1;
        self.start_line();
        if !matches!(body, Expr::Call { .. }) {
            self.output.push_str("return ");
        }
        self.write_expr(body);
        self.output.push(';');
        self.indent -= 1;
        self.start_line();
        self.output.push('}');
    }

    /// One entry per line. Keys are written as parsed, so an identifier key
    /// (`{bar: 1}`) names the property `bar` and never reads a variable.
    fn write_dict(&mut self, entries: &[(Expr, Expr)]) {
        if entries.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push('{');
        self.indent += 1;
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.start_line();
            self.write_expr(key);
            self.output.push_str(": ");
            self.write_expr(value);
        }
        self.indent -= 1;
        self.start_line();
        self.output.push('}');
    }
}

impl Default for JavaScriptWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn binary_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Is | BinaryOp::Eq => "===",
        BinaryOp::IsNot | BinaryOp::Ne => "!==",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_expression_statement() {
        let program = Program::new(vec![Stmt::expr(Expr::binary(
            Expr::number("2"),
            BinaryOp::Add,
            Expr::number("2"),
        ))]);
        assert_eq!(JavaScriptWriter::emit(&program), "2 + 2;");
    }

    #[test]
    fn test_hoisted_assignment() {
        let program = Program::new(vec![Stmt::assign("x", Expr::None)]);
        assert_eq!(JavaScriptWriter::emit(&program), "var x;\nx = null;");
    }

    #[test]
    fn test_multi_assignment_keeps_chain() {
        let program = Program::new(vec![Stmt::multi_assign(
            params(&["x", "y"]),
            Expr::number("2"),
        )]);
        assert_eq!(JavaScriptWriter::emit(&program), "var x, y;\nx = y = 2;");
    }

    #[test]
    fn test_literals() {
        let program = Program::new(vec![Stmt::expr(Expr::call(
            Expr::ident("f"),
            vec![
                Expr::Bool { value: true },
                Expr::Bool { value: false },
                Expr::None,
                Expr::number("2.2"),
                Expr::string("'s'"),
            ],
        ))]);
        assert_eq!(
            JavaScriptWriter::emit(&program),
            "f(true, false, null, 2.2, 's');"
        );
    }

    #[test]
    fn test_operator_mapping() {
        let cases = [
            (BinaryOp::Is, "a === b;"),
            (BinaryOp::IsNot, "a !== b;"),
            (BinaryOp::Eq, "a === b;"),
            (BinaryOp::Ne, "a !== b;"),
            (BinaryOp::And, "a && b;"),
            (BinaryOp::Or, "a || b;"),
            (BinaryOp::Le, "a <= b;"),
        ];
        for (op, expected) in cases {
            let program = Program::new(vec![Stmt::expr(Expr::binary(
                Expr::ident("a"),
                op,
                Expr::ident("b"),
            ))]);
            assert_eq!(JavaScriptWriter::emit(&program), expected);
        }
    }

    #[test]
    fn test_unary_operators() {
        let program = Program::new(vec![
            Stmt::expr(Expr::unary(UnaryOp::Not, Expr::ident("a"))),
            Stmt::expr(Expr::unary(
                UnaryOp::Neg,
                Expr::unary(UnaryOp::Neg, Expr::ident("a")),
            )),
        ]);
        assert_eq!(JavaScriptWriter::emit(&program), "!a;\n- -a;");
    }

    #[test]
    fn test_groups_render_one_pair_each() {
        let inner = Expr::grouped(Expr::grouped(Expr::ident("a")));
        let program = Program::new(vec![Stmt::expr(inner)]);
        assert_eq!(JavaScriptWriter::emit(&program), "((a));");
    }

    #[test]
    fn test_function_declaration() {
        let program = Program::new(vec![Stmt::Function(Function::new(
            "foo",
            params(&["a", "b"]),
            vec![Stmt::return_stmt(Some(Expr::binary(
                Expr::ident("a"),
                BinaryOp::Add,
                Expr::ident("b"),
            )))],
        ))]);
        assert_eq!(
            JavaScriptWriter::emit(&program),
            "var foo;\nfoo = function(a, b) {\n    return a + b;\n};"
        );
    }

    #[test]
    fn test_function_body_gets_own_var() {
        let program = Program::new(vec![Stmt::Function(Function::new(
            "foo",
            vec![],
            vec![
                Stmt::assign("x", Expr::number("1")),
                Stmt::return_stmt(Some(Expr::ident("x"))),
            ],
        ))]);
        assert_eq!(
            JavaScriptWriter::emit(&program),
            "var foo;\nfoo = function() {\n    var x;\n    x = 1;\n    return x;\n};"
        );
    }

    #[test]
    fn test_lambda_policy() {
        let call_body = Expr::lambda(
            params(&["e"]),
            Expr::call(Expr::attribute(Expr::ident("e"), "stop"), vec![]),
        );
        let value_body = Expr::lambda(
            params(&["a", "b"]),
            Expr::binary(Expr::ident("a"), BinaryOp::Mul, Expr::ident("b")),
        );
        let program = Program::new(vec![
            Stmt::expr(Expr::call(Expr::ident("on"), vec![call_body])),
            Stmt::expr(Expr::call(Expr::ident("reduce"), vec![value_body])),
        ]);
        assert_eq!(
            JavaScriptWriter::emit(&program),
            "on(function(e) {\n    e.stop();\n});\nreduce(function(a, b) {\n    return a * b;\n});"
        );
    }

    #[test]
    fn test_empty_dict() {
        let program = Program::new(vec![Stmt::assign("x", Expr::Dict { entries: vec![] })]);
        assert_eq!(JavaScriptWriter::emit(&program), "var x;\nx = {};");
    }

    #[test]
    fn test_list_is_compact() {
        let items = vec![
            Expr::number("1"),
            Expr::string("\"a b\""),
            Expr::List { items: vec![] },
        ];
        let program = Program::new(vec![Stmt::expr(Expr::List { items })]);
        assert_eq!(JavaScriptWriter::emit(&program), "[1,\"a b\",[]];");
    }

    #[test]
    fn test_index_and_attribute() {
        let program = Program::new(vec![Stmt::expr(Expr::Index {
            object: Box::new(Expr::attribute(Expr::ident("a"), "items")),
            index: Box::new(Expr::number("0")),
        })]);
        assert_eq!(JavaScriptWriter::emit(&program), "a.items[0];");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(JavaScriptWriter::emit(&Program::new(vec![])), "");
    }

    #[test]
    fn test_writer_trait() {
        let writer: &dyn Writer = &JAVASCRIPT_WRITER;
        assert_eq!(writer.language(), "javascript");
        assert_eq!(writer.extension(), "js");
        let program = Program::new(vec![Stmt::return_stmt(None)]);
        assert_eq!(writer.write(&program), "return;");
    }
}
