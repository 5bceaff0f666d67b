//! Code sink: the append-only accumulator every generation step writes to.

use std::collections::{BTreeSet, HashSet};

use crate::ir::{Expr, Param, Program, Stmt, Var};

/// Declarations, statements and formal parameters of one generation run.
///
/// Names are declared at most once; declaring an existing name again is a
/// no-op. Nothing is ever removed or rewritten.
#[derive(Debug, Default)]
pub struct CodeSink {
    declarations: Vec<Var>,
    declared: HashSet<Var>,
    params: BTreeSet<Param>,
    statements: Vec<Stmt>,
}

impl CodeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a local and return its name.
    pub fn declare_variable(&mut self, name: impl Into<String>) -> Var {
        let var = Var::new(name);
        if self.declared.insert(var.clone()) {
            self.declarations.push(var.clone());
        }
        var
    }

    /// Register a formal argument of the routine.
    pub fn declare_parameter(&mut self, param: Param) -> Param {
        self.params.insert(param);
        param
    }

    /// Register every parameter `expr` reads.
    pub fn declare_parameters(&mut self, expr: &Expr) {
        for param in expr.params() {
            self.declare_parameter(param);
        }
    }

    pub fn emit(&mut self, stmt: Stmt) {
        self.statements.push(stmt);
    }

    pub fn emit_all(&mut self, stmts: impl IntoIterator<Item = Stmt>) {
        self.statements.extend(stmts);
    }

    pub fn declarations(&self) -> &[Var] {
        &self.declarations
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.params.iter().copied()
    }

    pub fn finish(self) -> Program {
        Program {
            params: self.params.into_iter().collect(),
            declarations: self.declarations,
            statements: self.statements,
        }
    }
}
