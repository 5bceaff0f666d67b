//! Executes a generated [`Program`] without compiling it.

use std::collections::HashMap;

use super::{EvalError, ParamValues};
use crate::ir::{Cond, Program, Stmt, Value, Var};

/// Variable store for one run of a generated program.
///
/// Arithmetic is checked: overflow is an error rather than wrapping the way
/// the emitted C would.
pub struct Machine<'p> {
    params: &'p ParamValues,
    env: HashMap<Var, i64>,
}

impl<'p> Machine<'p> {
    pub fn new(params: &'p ParamValues) -> Self {
        Self {
            params,
            env: HashMap::new(),
        }
    }

    /// Run `program` and return the value of its trailing `Return`.
    pub fn run(&mut self, program: &Program) -> Result<i64, EvalError> {
        for param in &program.params {
            self.params.require(*param)?;
        }
        match self.exec_block(&program.statements)? {
            Some(value) => Ok(value),
            None => Err(EvalError::NoReturn),
        }
    }

    /// Current value of a variable, if it has been assigned.
    pub fn get(&self, var: &Var) -> Option<i64> {
        self.env.get(var).copied()
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Option<i64>, EvalError> {
        for stmt in stmts {
            if let Some(value) = self.exec(stmt)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<Option<i64>, EvalError> {
        match stmt {
            Stmt::Assign { dst, value } => {
                let v = self.value(value)?;
                self.env.insert(dst.clone(), v);
                Ok(None)
            }
            Stmt::IfOnly { cond, then_body } => {
                if self.test(cond)? {
                    self.exec_block(then_body)
                } else {
                    Ok(None)
                }
            }
            Stmt::IfElse {
                cond,
                then_body,
                else_body,
            } => {
                if self.test(cond)? {
                    self.exec_block(then_body)
                } else {
                    self.exec_block(else_body)
                }
            }
            Stmt::Return(var) => self.read(var).map(Some),
        }
    }

    fn read(&self, var: &Var) -> Result<i64, EvalError> {
        self.get(var)
            .ok_or_else(|| EvalError::UnassignedVariable(var.name().to_string()))
    }

    fn test(&self, cond: &Cond) -> Result<bool, EvalError> {
        Ok(match cond {
            Cond::Eq(var, n) => self.read(var)? == *n,
            Cond::AtLeast(var, n) => self.read(var)? >= *n,
            Cond::Greater(a, b) => self.read(a)? > self.read(b)?,
        })
    }

    fn value(&self, value: &Value) -> Result<i64, EvalError> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Var(var) => self.read(var),
            Value::Expr(expr) => expr.eval(self.params),
            Value::Sum(terms) => terms.iter().try_fold(0i64, |acc, term| {
                acc.checked_add(self.value(term)?)
                    .ok_or(EvalError::Overflow)
            }),
            Value::Mul(a, b) => self
                .value(a)?
                .checked_mul(self.value(b)?)
                .ok_or(EvalError::Overflow),
            Value::Sub(a, b) => self
                .value(a)?
                .checked_sub(self.value(b)?)
                .ok_or(EvalError::Overflow),
            Value::Select {
                test,
                then,
                otherwise,
            } => {
                if test.eval(self.params)? != 0 {
                    self.value(then)
                } else {
                    self.value(otherwise)
                }
            }
        }
    }
}

/// Run `program` once with `params`.
pub fn run(program: &Program, params: &ParamValues) -> Result<i64, EvalError> {
    Machine::new(params).run(program)
}
