//! Rust lowering: a `pub fn` over `i64` with C truthiness spelled out.

use super::{line, lower_block, ordinal, Lowering, TargetSyntax, PREC_ATOM};
use crate::ir::{BinOp, Expr, Program, UnOp};

#[derive(Default)]
pub struct RustLowering;

impl RustLowering {
    pub fn new() -> Self {
        Self
    }
}

/// An `i64`-valued Rust expression; compound forms come parenthesized.
fn rust_expr(expr: &Expr) -> String {
    match expr {
        Expr::Int(n) if *n < 0 => format!("({})", n),
        Expr::Int(n) => n.to_string(),
        Expr::Param(p) => p.to_string(),
        Expr::Unary(UnOp::Neg, inner) => format!("(-{})", rust_expr(inner)),
        Expr::Unary(UnOp::Not, inner) => format!("(({} == 0) as i64)", rust_expr(inner)),
        Expr::Binary(BinOp::And, lhs, rhs) => format!(
            "(({} != 0 && {} != 0) as i64)",
            rust_expr(lhs),
            rust_expr(rhs)
        ),
        Expr::Binary(BinOp::Or, lhs, rhs) => format!(
            "(({} != 0 || {} != 0) as i64)",
            rust_expr(lhs),
            rust_expr(rhs)
        ),
        Expr::Binary(op, lhs, rhs) if op.is_boolean() => format!(
            "(({} {} {}) as i64)",
            rust_expr(lhs),
            op.symbol(),
            rust_expr(rhs)
        ),
        Expr::Binary(op, lhs, rhs) => {
            format!("({} {} {})", rust_expr(lhs), op.symbol(), rust_expr(rhs))
        }
    }
}

impl TargetSyntax for RustLowering {
    fn expr(&self, expr: &Expr) -> (String, u8) {
        (rust_expr(expr), PREC_ATOM)
    }

    fn select(&self, test: &Expr, then: &str, otherwise: &str) -> String {
        format!("if {} != 0 {{ {} }} else {{ {} }}", rust_expr(test), then, otherwise)
    }

    fn guard(&self, cond: &str) -> String {
        format!("if {} {{", cond)
    }
}

impl Lowering for RustLowering {
    fn lower(&self, program: &Program, name: &str) -> String {
        let mut out = vec!["/// WCET evaluation function.".to_string(), "///".to_string()];
        for param in &program.params {
            out.push(format!("/// * `{}`: {} procedure argument", param, ordinal(*param)));
        }
        if !program.params.is_empty() {
            out.push("///".to_string());
        }
        out.push(
            "/// Returns the WCET of the procedure depending on its arguments.".to_string(),
        );
        out.push(
            "#[allow(unused_mut, unused_assignments, unused_parens, clippy::all)]".to_string(),
        );
        let params: Vec<String> = program
            .params
            .iter()
            .map(|p| format!("{}: i64", p))
            .collect();
        out.push(format!("pub fn {}({}) -> i64 {{", name, params.join(", ")));
        for var in &program.declarations {
            line(self, &mut out, 0, &format!("let mut {}: i64 = 0;", var));
        }
        out.push(String::new());
        lower_block(self, &program.statements, 0, &mut out);
        out.push("}".to_string());

        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    fn extension(&self) -> &'static str {
        "rs"
    }
}
