//! Lowering: renders a generated [`Program`] as target source text.
//!
//! Each target implements `Lowering` and controls its own function
//! signature, declarations and statement syntax. Arithmetic on values is
//! shared: operands are parenthesized only where precedence needs it.

mod c;
mod rust;

use crate::diagnostic::Diagnostic;
use crate::ir::{Cond, Expr, Param, Program, Stmt, Value};
use crate::span::Span;

pub use c::CLowering;
pub use rust::RustLowering;

/// Target names accepted by [`create_lowering`].
pub const TARGETS: [&str; 2] = ["c", "rust"];

/// Renders a program as one routine in a target language.
pub trait Lowering {
    /// Render `program` as a routine called `name`.
    fn lower(&self, program: &Program, name: &str) -> String;

    /// File extension for rendered output, without the dot.
    fn extension(&self) -> &'static str;
}

/// Create a lowering backend for the given target name.
pub fn create_lowering(target: &str) -> Result<Box<dyn Lowering>, Diagnostic> {
    match target {
        "c" => Ok(Box::new(CLowering::new())),
        "rust" | "rs" => Ok(Box::new(RustLowering::new())),
        other => Err(Diagnostic::error(
            format!("unknown target '{}'", other),
            Span::dummy(),
        )
        .with_help(format!("available targets: {}", TARGETS.join(", ")))),
    }
}

/// True for names usable as a routine name in every target.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `1st`, `2nd`, ... for the documentation banner.
fn ordinal(param: Param) -> String {
    let n = param.index() + 1;
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

// Binding strength of a rendered value; higher binds tighter.
const PREC_SELECT: u8 = 1;
const PREC_ADD: u8 = 2;
const PREC_MUL: u8 = 3;
const PREC_UNARY: u8 = 4;
const PREC_ATOM: u8 = 5;

/// Target syntax for the parts of a routine body that differ between
/// targets.
trait TargetSyntax {
    /// Rendered expression and its binding strength.
    fn expr(&self, expr: &Expr) -> (String, u8);

    /// `test ? then : otherwise` with C truthiness on `test`.
    fn select(&self, test: &Expr, then: &str, otherwise: &str) -> String;

    /// Opening line of an `if` block testing `cond`.
    fn guard(&self, cond: &str) -> String;

    /// Indentation depth of the routine body.
    fn indent(&self) -> usize {
        1
    }
}

fn line(syntax: &dyn TargetSyntax, out: &mut Vec<String>, depth: usize, s: &str) {
    out.push(format!("{}{}", "    ".repeat(syntax.indent() + depth), s));
}

fn lower_block(syntax: &dyn TargetSyntax, stmts: &[Stmt], depth: usize, out: &mut Vec<String>) {
    for stmt in stmts {
        match stmt {
            Stmt::Assign { dst, value } => {
                let text = format!("{} = {};", dst, render_value(syntax, value, 0));
                line(syntax, out, depth, &text);
            }
            Stmt::IfOnly { cond, then_body } => {
                line(syntax, out, depth, &syntax.guard(&cond_text(cond)));
                lower_block(syntax, then_body, depth + 1, out);
                line(syntax, out, depth, "}");
            }
            Stmt::IfElse {
                cond,
                then_body,
                else_body,
            } => {
                line(syntax, out, depth, &syntax.guard(&cond_text(cond)));
                lower_block(syntax, then_body, depth + 1, out);
                line(syntax, out, depth, "} else {");
                lower_block(syntax, else_body, depth + 1, out);
                line(syntax, out, depth, "}");
            }
            Stmt::Return(var) => line(syntax, out, depth, &format!("return {};", var)),
        }
    }
}

/// Guards compare variables against integers; both targets spell them alike.
fn cond_text(cond: &Cond) -> String {
    match cond {
        Cond::Eq(var, n) => format!("{} == {}", var, n),
        Cond::AtLeast(var, n) => format!("{} >= {}", var, n),
        Cond::Greater(a, b) => format!("{} > {}", a, b),
    }
}

/// Render `value` for a context that binds at least as tightly as `min`.
fn render_value(syntax: &dyn TargetSyntax, value: &Value, min: u8) -> String {
    let (text, prec) = match value {
        Value::Int(n) if *n < 0 => (n.to_string(), PREC_UNARY),
        Value::Int(n) => (n.to_string(), PREC_ATOM),
        Value::Var(var) => (var.to_string(), PREC_ATOM),
        Value::Expr(expr) => syntax.expr(expr),
        Value::Sum(terms) => {
            let terms: Vec<String> = terms
                .iter()
                .map(|t| render_value(syntax, t, PREC_ADD))
                .collect();
            (terms.join(" + "), PREC_ADD)
        }
        Value::Sub(lhs, rhs) => (
            format!(
                "{} - {}",
                render_value(syntax, lhs, PREC_ADD),
                render_value(syntax, rhs, PREC_MUL)
            ),
            PREC_ADD,
        ),
        Value::Mul(lhs, rhs) => (
            format!(
                "{} * {}",
                render_value(syntax, lhs, PREC_MUL),
                render_value(syntax, rhs, PREC_UNARY)
            ),
            PREC_MUL,
        ),
        Value::Select {
            test,
            then,
            otherwise,
        } => (
            syntax.select(
                test,
                &render_value(syntax, then, PREC_ADD),
                &render_value(syntax, otherwise, PREC_ADD),
            ),
            PREC_SELECT,
        ),
    };
    if prec < min {
        format!("({})", text)
    } else {
        text
    }
}
