//! Integer expressions over the routine's parameters.
//!
//! Loop bounds and conditional tests are written against `param_0` ..
//! `param_3`. Semantics follow C: comparisons and logical operators yield
//! 0 or 1, and any non-zero value is true.

use std::collections::BTreeSet;
use std::fmt;

use super::Param;
use crate::codegen::GenError;
use crate::eval::{EvalError, ParamValues};
use crate::lexeme::Lexeme;
use crate::lexer::Lexer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    /// Returns (left binding power, right binding power).
    /// Higher binding power = higher precedence.
    pub(crate) fn binding_power(self) -> (u8, u8) {
        match self {
            BinOp::Or => (1, 2),
            BinOp::And => (3, 4),
            BinOp::Eq | BinOp::Ne => (5, 6),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => (7, 8),
            BinOp::Add | BinOp::Sub => (9, 10),
            BinOp::Mul | BinOp::Div | BinOp::Rem => (11, 12),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    /// True for operators whose result is a 0/1 truth value.
    pub fn is_boolean(self) -> bool {
        !matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    Param(Param),
    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Parse expression text such as `param_0 * 2 + 1`.
    ///
    /// Identifiers other than `param_0` .. `param_3` are rejected with
    /// [`GenError::UnresolvedParameter`] before the text is parsed.
    pub fn parse(text: &str) -> Result<Expr, GenError> {
        let (tokens, _) = Lexer::new(text).tokenize();
        for token in &tokens {
            if let Lexeme::Ident(name) = &token.node {
                Param::from_name(name)?;
            }
        }
        crate::parser::parse_expr(text, 0).map_err(|diags| {
            let message = diags
                .first()
                .map(|d| d.message.clone())
                .unwrap_or_else(|| "invalid expression".to_string());
            GenError::InvalidExpression(format!("{}: {}", text, message))
        })
    }

    /// Parameters referenced anywhere in the expression, sorted by index.
    pub fn params(&self) -> BTreeSet<Param> {
        let mut out = BTreeSet::new();
        self.collect_params(&mut out);
        out
    }

    fn collect_params(&self, out: &mut BTreeSet<Param>) {
        match self {
            Expr::Int(_) => {}
            Expr::Param(p) => {
                out.insert(*p);
            }
            Expr::Unary(_, inner) => inner.collect_params(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_params(out);
                rhs.collect_params(out);
            }
        }
    }

    pub fn eval(&self, params: &ParamValues) -> Result<i64, EvalError> {
        match self {
            Expr::Int(n) => Ok(*n),
            Expr::Param(p) => params.require(*p),
            Expr::Unary(UnOp::Neg, inner) => inner
                .eval(params)?
                .checked_neg()
                .ok_or(EvalError::Overflow),
            Expr::Unary(UnOp::Not, inner) => Ok((inner.eval(params)? == 0) as i64),
            Expr::Binary(BinOp::And, lhs, rhs) => {
                // Short-circuit like the emitted C does.
                Ok((lhs.eval(params)? != 0 && rhs.eval(params)? != 0) as i64)
            }
            Expr::Binary(BinOp::Or, lhs, rhs) => {
                Ok((lhs.eval(params)? != 0 || rhs.eval(params)? != 0) as i64)
            }
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(params)?;
                let b = rhs.eval(params)?;
                let value = match op {
                    BinOp::Add => a.checked_add(b).ok_or(EvalError::Overflow)?,
                    BinOp::Sub => a.checked_sub(b).ok_or(EvalError::Overflow)?,
                    BinOp::Mul => a.checked_mul(b).ok_or(EvalError::Overflow)?,
                    BinOp::Div | BinOp::Rem if b == 0 => return Err(EvalError::DivisionByZero),
                    BinOp::Div => a.checked_div(b).ok_or(EvalError::Overflow)?,
                    BinOp::Rem => a.checked_rem(b).ok_or(EvalError::Overflow)?,
                    BinOp::Eq => (a == b) as i64,
                    BinOp::Ne => (a != b) as i64,
                    BinOp::Lt => (a < b) as i64,
                    BinOp::Le => (a <= b) as i64,
                    BinOp::Gt => (a > b) as i64,
                    BinOp::Ge => (a >= b) as i64,
                    BinOp::And | BinOp::Or => unreachable!("handled above"),
                };
                Ok(value)
            }
        }
    }
}

impl From<Param> for Expr {
    fn from(p: Param) -> Self {
        Expr::Param(p)
    }
}

/// C syntax. Nested binary operations are parenthesized, the outermost
/// one is not.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary(op, lhs, rhs) => {
                write!(f, "{} {} {}", Operand(lhs), op.symbol(), Operand(rhs))
            }
            other => write!(f, "{}", Operand(other)),
        }
    }
}

struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Int(n) if *n < 0 => write!(f, "({})", n),
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Param(p) => write!(f, "{}", p),
            Expr::Unary(UnOp::Neg, inner) => write!(f, "-{}", Operand(inner)),
            Expr::Unary(UnOp::Not, inner) => write!(f, "!{}", Operand(inner)),
            Expr::Binary(..) => write!(f, "({})", self.0),
        }
    }
}
