//! Eta-vector code generation.
//!
//! Every node generates its children first, appends statements to the
//! [`CodeSink`], and hands its parent a [`Generated`]: the loop level its
//! cost is still a function of, plus the names of its eta slots.
//!
//! Slot `i` of an eta vector is the cost of iteration `i` of the enclosing
//! scope; the last slot repeats for every later iteration, so
//! `value(n) = sum_{t < n} eta[min(t, len - 1)]`.

mod error;
mod loops;
mod merge;
#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::ir::{Expr, LoopLevel, Node, NodeId, NodeKind, Program, Stmt, Value, Var};
use crate::sink::CodeSink;

pub use error::GenError;
pub use merge::merge;

/// Result of generating one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generated {
    pub level: LoopLevel,
    pub eta: Vec<Var>,
}

impl Generated {
    /// Slot `i`, or the last slot once `i` runs past the end.
    pub fn slot(&self, i: usize) -> &Var {
        &self.eta[i.min(self.eta.len() - 1)]
    }
}

/// Walks a cost tree once, emitting into a borrowed sink.
pub struct Generator<'a> {
    sink: &'a mut CodeSink,
    next_id: u32,
    generated: HashSet<NodeId>,
    loops: HashSet<u32>,
}

impl<'a> Generator<'a> {
    pub fn new(sink: &'a mut CodeSink) -> Self {
        Self {
            sink,
            next_id: 0,
            generated: HashSet::new(),
            loops: HashSet::new(),
        }
    }

    pub fn generate(&mut self, node: &Node) -> Result<Generated, GenError> {
        if !self.generated.insert(node.id()) {
            return Err(GenError::DoubleGeneration(node.id()));
        }
        let result = match &node.kind {
            NodeKind::Constant { level, values } => self.constant(node.id(), *level, values)?,
            NodeKind::Sequence { children } => self.sequence(node.id(), children)?,
            NodeKind::Alternative { left, right } => self.alternative(left, right)?,
            NodeKind::Loop { body, id, bound } => self.bounded_loop(body, *id, bound)?,
            NodeKind::Conditional { test, subtree } => self.conditional(test, subtree)?,
        };
        if result.eta.is_empty() {
            return Err(GenError::EmptyEtaVector(node.id()));
        }
        Ok(result)
    }

    fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn constant(
        &mut self,
        node: NodeId,
        level: LoopLevel,
        values: &[i64],
    ) -> Result<Generated, GenError> {
        if values.is_empty() {
            return Err(GenError::EmptyEtaVector(node));
        }
        let id = self.fresh_id();
        let eta = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let slot = self.sink.declare_variable(format!("cst_{}_eta_{}", id, i));
                self.sink.emit(Stmt::assign(&slot, Value::Int(value)));
                slot
            })
            .collect();
        Ok(Generated { level, eta })
    }

    /// Slot-wise sum. A child shorter than the widest one keeps adding its
    /// last slot, its steady per-iteration rate.
    fn sequence(&mut self, node: NodeId, children: &[Node]) -> Result<Generated, GenError> {
        if children.is_empty() {
            return Err(GenError::EmptySequence(node));
        }
        let id = self.fresh_id();
        let results = children
            .iter()
            .map(|child| self.generate(child))
            .collect::<Result<Vec<_>, _>>()?;

        let width = results.iter().map(|r| r.eta.len()).max().unwrap_or(1);
        let level = results
            .iter()
            .map(|r| r.level)
            .max()
            .unwrap_or(LoopLevel::Top);

        let eta = (0..width)
            .map(|i| {
                let slot = self.sink.declare_variable(format!("seq_{}_eta_{}", id, i));
                let terms = results.iter().map(|r| Value::var(r.slot(i))).collect();
                self.sink.emit(Stmt::assign(&slot, Value::sum(terms)));
                slot
            })
            .collect();
        Ok(Generated { level, eta })
    }

    /// Zero every slot of `subtree` unless `test` holds.
    fn conditional(&mut self, test: &Expr, subtree: &Node) -> Result<Generated, GenError> {
        let inner = self.generate(subtree)?;
        self.sink.declare_parameters(test);
        for slot in &inner.eta {
            self.sink.emit(Stmt::assign(
                slot,
                Value::Select {
                    test: test.clone(),
                    then: Box::new(Value::var(slot)),
                    otherwise: Box::new(Value::Int(0)),
                },
            ));
        }
        Ok(inner)
    }
}

/// Generate `root` into a fresh sink and return the finished program,
/// which returns slot 0 of the root's eta vector.
pub fn generate_program(root: &Node) -> Result<Program, GenError> {
    let mut sink = CodeSink::new();
    let result = Generator::new(&mut sink).generate(root)?;
    sink.emit(Stmt::Return(result.eta[0].clone()));
    Ok(sink.finish())
}
