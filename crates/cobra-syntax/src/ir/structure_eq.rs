//! Structural equality for syntax trees.
//!
//! `structure_eq` compares trees ignoring `Expr::Grouped` wrappers. Grouping
//! only shapes the rendered text; two trees that differ solely in explicit
//! parentheses describe the same computation.
//!
//! # Core Fields (must match exactly)
//!
//! - All names, literal text, operators
//! - Control flow structure
//! - Expression trees (after unwrapping groups)

use super::{Branch, Expr, Function, IfChain, Program, Stmt};

/// Trait for structural equality comparison.
///
/// Unlike `PartialEq`, this treats `(x)` and `x` as the same expression.
pub trait StructureEq {
    /// Compare two values for structural equality.
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for Program {
    fn structure_eq(&self, other: &Self) -> bool {
        vec_structure_eq(&self.body, &other.body)
    }
}

impl StructureEq for Stmt {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Stmt::Assign {
                    target: t1,
                    value: v1,
                },
                Stmt::Assign {
                    target: t2,
                    value: v2,
                },
            ) => t1 == t2 && v1.structure_eq(v2),

            (
                Stmt::MultiAssign {
                    targets: t1,
                    value: v1,
                },
                Stmt::MultiAssign {
                    targets: t2,
                    value: v2,
                },
            ) => t1 == t2 && v1.structure_eq(v2),

            (Stmt::Function(a), Stmt::Function(b)) => a.structure_eq(b),

            (Stmt::Return { value: a }, Stmt::Return { value: b }) => {
                option_structure_eq(a.as_ref(), b.as_ref())
            }

            (Stmt::If(a), Stmt::If(b)) => a.structure_eq(b),

            (Stmt::Expr { expr: a }, Stmt::Expr { expr: b }) => a.structure_eq(b),

            _ => false,
        }
    }
}

impl StructureEq for Function {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params == other.params
            && vec_structure_eq(&self.body, &other.body)
    }
}

impl StructureEq for IfChain {
    fn structure_eq(&self, other: &Self) -> bool {
        vec_structure_eq(&self.branches, &other.branches)
            && match (&self.orelse, &other.orelse) {
                (None, None) => true,
                (Some(a), Some(b)) => vec_structure_eq(a, b),
                _ => false,
            }
    }
}

impl StructureEq for Branch {
    fn structure_eq(&self, other: &Self) -> bool {
        self.test.structure_eq(&other.test) && vec_structure_eq(&self.body, &other.body)
    }
}

impl StructureEq for Expr {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self.ungrouped(), other.ungrouped()) {
            (Expr::Ident { name: a }, Expr::Ident { name: b }) => a == b,
            (Expr::Number { text: a }, Expr::Number { text: b }) => a == b,
            (Expr::String { text: a }, Expr::String { text: b }) => a == b,
            (Expr::None, Expr::None) => true,
            (Expr::Bool { value: a }, Expr::Bool { value: b }) => a == b,

            (
                Expr::Binary {
                    left: l1,
                    op: o1,
                    right: r1,
                },
                Expr::Binary {
                    left: l2,
                    op: o2,
                    right: r2,
                },
            ) => o1 == o2 && l1.structure_eq(l2) && r1.structure_eq(r2),

            (
                Expr::Unary {
                    op: o1,
                    operand: e1,
                },
                Expr::Unary {
                    op: o2,
                    operand: e2,
                },
            ) => o1 == o2 && e1.structure_eq(e2),

            (
                Expr::Call {
                    callee: c1,
                    args: a1,
                },
                Expr::Call {
                    callee: c2,
                    args: a2,
                },
            ) => c1.structure_eq(c2) && vec_structure_eq(a1, a2),

            (
                Expr::Attribute {
                    object: o1,
                    name: n1,
                },
                Expr::Attribute {
                    object: o2,
                    name: n2,
                },
            ) => n1 == n2 && o1.structure_eq(o2),

            (
                Expr::Index {
                    object: o1,
                    index: i1,
                },
                Expr::Index {
                    object: o2,
                    index: i2,
                },
            ) => o1.structure_eq(o2) && i1.structure_eq(i2),

            (
                Expr::Lambda {
                    params: p1,
                    body: b1,
                },
                Expr::Lambda {
                    params: p2,
                    body: b2,
                },
            ) => p1 == p2 && b1.structure_eq(b2),

            (Expr::List { items: a }, Expr::List { items: b }) => vec_structure_eq(a, b),

            (Expr::Dict { entries: a }, Expr::Dict { entries: b }) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((k1, v1), (k2, v2))| k1.structure_eq(k2) && v1.structure_eq(v2))
            }

            _ => false,
        }
    }
}

fn vec_structure_eq<T: StructureEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structure_eq(y))
}

fn option_structure_eq<T: StructureEq>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x.structure_eq(y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryOp;

    #[test]
    fn test_grouping_is_ignored() {
        let plain = Expr::binary(Expr::number("1"), BinaryOp::Add, Expr::ident("x"));
        let grouped = Expr::grouped(Expr::grouped(plain.clone()));
        assert!(plain.structure_eq(&grouped));
        assert_ne!(plain, grouped);
    }

    #[test]
    fn test_literal_text_must_match() {
        assert!(!Expr::number("2.2").structure_eq(&Expr::number("2.20")));
    }

    #[test]
    fn test_nested_grouping_inside_operands() {
        let a = Stmt::assign(
            "x",
            Expr::binary(
                Expr::number("2"),
                BinaryOp::Mul,
                Expr::grouped(Expr::binary(
                    Expr::number("3"),
                    BinaryOp::Add,
                    Expr::number("4"),
                )),
            ),
        );
        let b = Stmt::assign(
            "x",
            Expr::binary(
                Expr::number("2"),
                BinaryOp::Mul,
                Expr::binary(Expr::number("3"), BinaryOp::Add, Expr::number("4")),
            ),
        );
        assert!(a.structure_eq(&b));
        assert!(!a.structure_eq(&Stmt::assign("y", Expr::number("2"))));
    }
}
