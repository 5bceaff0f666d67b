//! Worst case of two alternatives.
//!
//! The inputs are two staircases whose breakpoints need not line up, so the
//! result is not a slot-wise maximum. Slots are interleaved like the merge
//! step of merge sort, comparing values at runtime: result slot `k` is the
//! larger of the two sides' next unused slots. Once one side runs out, every
//! remaining slot repeats the last value taken. For non-increasing inputs
//! the merged staircase dominates both sides at every iteration count.

use super::{GenError, Generated, Generator};
use crate::ir::{Cond, Node, Stmt, Value, Var};

impl Generator<'_> {
    pub(super) fn alternative(&mut self, left: &Node, right: &Node) -> Result<Generated, GenError> {
        let id = self.fresh_id();
        let left = self.generate(left)?;
        let right = self.generate(right)?;

        let width = left.eta.len() + right.eta.len() - 1;
        let eta: Vec<Var> = (0..width)
            .map(|i| self.sink.declare_variable(format!("alt_{}_eta_{}", id, i)))
            .collect();
        self.sink.emit_all(merge(&eta, &left.eta, &right.eta));

        Ok(Generated {
            level: left.level.max(right.level),
            eta,
        })
    }
}

/// Statements assigning `result` the merge of `left` and `right`.
///
/// Emits a decision tree of depth `left.len() + right.len() - 1` when
/// `result` has that many slots.
pub fn merge(result: &[Var], left: &[Var], right: &[Var]) -> Vec<Stmt> {
    merge_from(result, left, right, None)
}

fn merge_from(result: &[Var], a: &[Var], b: &[Var], last: Option<&Var>) -> Vec<Stmt> {
    let (Some((a0, a_rest)), Some((b0, b_rest))) = (a.split_first(), b.split_first()) else {
        let fill = last.or_else(|| a.last()).or_else(|| b.last());
        return match fill {
            Some(held) => result.iter().map(|r| Stmt::assign(r, Value::var(held))).collect(),
            None => Vec::new(),
        };
    };
    let Some((slot, rest)) = result.split_first() else {
        return Vec::new();
    };

    let mut then_body = vec![Stmt::assign(slot, Value::var(a0))];
    then_body.extend(merge_from(rest, a_rest, b, Some(a0)));

    let mut else_body = vec![Stmt::assign(slot, Value::var(b0))];
    else_body.extend(merge_from(rest, a, b_rest, Some(b0)));

    vec![Stmt::IfElse {
        cond: Cond::Greater(a0.clone(), b0.clone()),
        then_body,
        else_body,
    }]
}
