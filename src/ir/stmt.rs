//! Emitted statement descriptors.
//!
//! Generation does not produce text. It appends [`Stmt`]s to a code sink,
//! and a [`crate::lower::Lowering`] renders the finished [`Program`] for a
//! target language. The same program can be run by [`crate::eval::Machine`].

use std::fmt;

use super::{Expr, Param};

/// A named eta slot or bound variable in the generated routine.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(String);

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Var(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Right-hand side of an assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Var(Var),
    /// A parameter expression copied verbatim (loop bounds).
    Expr(Expr),
    /// Sum of at least two terms.
    Sum(Vec<Value>),
    Mul(Box<Value>, Box<Value>),
    Sub(Box<Value>, Box<Value>),
    /// `test ? then : otherwise`, C truthiness.
    Select {
        test: Expr,
        then: Box<Value>,
        otherwise: Box<Value>,
    },
}

impl Value {
    pub fn var(var: &Var) -> Value {
        Value::Var(var.clone())
    }

    /// Sum of `terms`, collapsed: no terms is `0`, one term is itself.
    pub fn sum(mut terms: Vec<Value>) -> Value {
        match terms.len() {
            0 => Value::Int(0),
            1 => terms.remove(0),
            _ => Value::Sum(terms),
        }
    }

    pub fn sum_of(vars: &[Var]) -> Value {
        Value::sum(vars.iter().map(Value::var).collect())
    }

    pub fn mul(lhs: Value, rhs: Value) -> Value {
        Value::Mul(Box::new(lhs), Box::new(rhs))
    }

    pub fn sub(lhs: Value, rhs: Value) -> Value {
        Value::Sub(Box::new(lhs), Box::new(rhs))
    }
}

/// Guard of an emitted `if`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cond {
    /// `var == n`
    Eq(Var, i64),
    /// `var >= n`
    AtLeast(Var, i64),
    /// `a > b`
    Greater(Var, Var),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    Assign {
        dst: Var,
        value: Value,
    },
    IfOnly {
        cond: Cond,
        then_body: Vec<Stmt>,
    },
    IfElse {
        cond: Cond,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    Return(Var),
}

impl Stmt {
    pub fn assign(dst: &Var, value: Value) -> Stmt {
        Stmt::Assign {
            dst: dst.clone(),
            value,
        }
    }

    /// Number of statements, counting nested bodies.
    pub fn count(&self) -> usize {
        match self {
            Stmt::Assign { .. } | Stmt::Return(_) => 1,
            Stmt::IfOnly { then_body, .. } => 1 + count_all(then_body),
            Stmt::IfElse {
                then_body,
                else_body,
                ..
            } => 1 + count_all(then_body) + count_all(else_body),
        }
    }

    /// Deepest `if` nesting below and including this statement.
    pub fn depth(&self) -> usize {
        match self {
            Stmt::Assign { .. } | Stmt::Return(_) => 0,
            Stmt::IfOnly { then_body, .. } => 1 + max_depth(then_body),
            Stmt::IfElse {
                then_body,
                else_body,
                ..
            } => 1 + max_depth(then_body).max(max_depth(else_body)),
        }
    }
}

pub fn count_all(stmts: &[Stmt]) -> usize {
    stmts.iter().map(Stmt::count).sum()
}

pub fn max_depth(stmts: &[Stmt]) -> usize {
    stmts.iter().map(Stmt::depth).max().unwrap_or(0)
}

/// A finished generation run: what the routine takes, declares and does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    /// Formal arguments, sorted by index.
    pub params: Vec<Param>,
    /// Locals in first-declaration order.
    pub declarations: Vec<Var>,
    pub statements: Vec<Stmt>,
}

impl Program {
    /// The variable returned by the trailing `Return`, if any.
    pub fn result(&self) -> Option<&Var> {
        match self.statements.last() {
            Some(Stmt::Return(var)) => Some(var),
            _ => None,
        }
    }

    pub fn statement_count(&self) -> usize {
        count_all(&self.statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_collapses() {
        assert_eq!(Value::sum(Vec::new()), Value::Int(0));
        assert_eq!(Value::sum(vec![Value::Int(3)]), Value::Int(3));
        let a = Var::new("a");
        let b = Var::new("b");
        assert_eq!(
            Value::sum_of(&[a.clone(), b.clone()]),
            Value::Sum(vec![Value::Var(a), Value::Var(b)])
        );
    }

    #[test]
    fn test_count_and_depth() {
        let x = Var::new("x");
        let inner = Stmt::IfOnly {
            cond: Cond::Eq(x.clone(), 0),
            then_body: vec![Stmt::assign(&x, Value::Int(1))],
        };
        let outer = Stmt::IfElse {
            cond: Cond::Greater(x.clone(), x.clone()),
            then_body: vec![inner, Stmt::assign(&x, Value::Int(2))],
            else_body: vec![Stmt::assign(&x, Value::Int(3))],
        };
        assert_eq!(outer.count(), 5);
        assert_eq!(outer.depth(), 2);
    }

    #[test]
    fn test_program_result() {
        let r = Var::new("r");
        let program = Program {
            params: Vec::new(),
            declarations: vec![r.clone()],
            statements: vec![Stmt::assign(&r, Value::Int(1)), Stmt::Return(r.clone())],
        };
        assert_eq!(program.result(), Some(&r));
        assert_eq!(program.statement_count(), 2);
    }
}
