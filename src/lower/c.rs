//! C lowering: one `int` routine with a documentation banner.

use super::{line, lower_block, ordinal, Lowering, TargetSyntax, PREC_ATOM, PREC_UNARY};
use crate::ir::{Expr, Program};

/// Produces C89-compatible source: declarations first, block `if`s,
/// `int` arithmetic.
pub struct CLowering {
    /// Indentation depth for nested control flow.
    indent: usize,
}

impl Default for CLowering {
    fn default() -> Self {
        Self { indent: 1 }
    }
}

impl CLowering {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TargetSyntax for CLowering {
    fn expr(&self, expr: &Expr) -> (String, u8) {
        let prec = match expr {
            Expr::Int(n) if *n < 0 => PREC_UNARY,
            Expr::Int(_) | Expr::Param(_) => PREC_ATOM,
            Expr::Unary(..) => PREC_UNARY,
            Expr::Binary(..) => 0,
        };
        (expr.to_string(), prec)
    }

    fn select(&self, test: &Expr, then: &str, otherwise: &str) -> String {
        format!("({}) ? {} : {}", test, then, otherwise)
    }

    fn guard(&self, cond: &str) -> String {
        format!("if ({}) {{", cond)
    }

    fn indent(&self) -> usize {
        self.indent
    }
}

impl Lowering for CLowering {
    fn lower(&self, program: &Program, name: &str) -> String {
        let mut out = Vec::new();
        out.push("/*".to_string());
        out.push(" * WCET evaluation function".to_string());
        for param in &program.params {
            out.push(format!(
                " * @param {} {} procedure argument",
                param,
                ordinal(*param)
            ));
        }
        out.push(" * @return The WCET of the procedure depending on its arguments".to_string());
        out.push(" */".to_string());

        let params = if program.params.is_empty() {
            "void".to_string()
        } else {
            program
                .params
                .iter()
                .map(|p| format!("int {}", p))
                .collect::<Vec<_>>()
                .join(", ")
        };
        out.push(format!("int {}({}) {{", name, params));
        for var in &program.declarations {
            line(self, &mut out, 0, &format!("int {};", var));
        }
        out.push(String::new());
        lower_block(self, &program.statements, 0, &mut out);
        out.push("}".to_string());

        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    fn extension(&self) -> &'static str {
        "c"
    }
}
