//! Reference evaluator.
//!
//! Computes the eta vector of a cost tree directly with integers, following
//! the same algebra the generator emits code for. Used to check generated
//! programs and by `pwcet eval --reference`.

use super::{checked_sum, EtaValues, EvalError, ParamValues};
use crate::codegen::GenError;
use crate::ir::{Bound, LoopLevel, Node, NodeKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluated {
    pub level: LoopLevel,
    pub eta: EtaValues,
}

pub fn evaluate(node: &Node, params: &ParamValues) -> Result<Evaluated, EvalError> {
    let result = match &node.kind {
        NodeKind::Constant { level, values } => Evaluated {
            level: *level,
            eta: EtaValues(values.clone()),
        },
        NodeKind::Sequence { children } => {
            if children.is_empty() {
                return Err(GenError::EmptySequence(node.id()).into());
            }
            let results = children
                .iter()
                .map(|c| evaluate(c, params))
                .collect::<Result<Vec<_>, _>>()?;
            let width = results.iter().map(|r| r.eta.len()).max().unwrap_or(1);
            let mut eta = Vec::with_capacity(width);
            for i in 0..width {
                let mut total: i64 = 0;
                for r in &results {
                    total = total
                        .checked_add(slot(&r.eta, i))
                        .ok_or(EvalError::Overflow)?;
                }
                eta.push(total);
            }
            Evaluated {
                level: results.iter().map(|r| r.level).max().unwrap_or(LoopLevel::Top),
                eta: EtaValues(eta),
            }
        }
        NodeKind::Alternative { left, right } => {
            let left = evaluate(left, params)?;
            let right = evaluate(right, params)?;
            Evaluated {
                level: left.level.max(right.level),
                eta: merge_values(&left.eta, &right.eta),
            }
        }
        NodeKind::Loop { body, id, bound } => {
            let inner = evaluate(body, params)?;
            if inner.level > LoopLevel::Loop(*id) {
                return Err(GenError::LevelOrder {
                    loop_id: *id,
                    body_level: inner.level,
                }
                .into());
            }
            let count = match bound {
                Bound::Literal(n) => i64::from(*n),
                Bound::Param(expr) => expr.eval(params)?,
            };
            if count < 0 {
                return Err(EvalError::NegativeBound {
                    loop_id: *id,
                    value: count,
                });
            }
            if inner.level == LoopLevel::Loop(*id) {
                Evaluated {
                    level: LoopLevel::Top,
                    eta: EtaValues(vec![inner.eta.value(count as u64)?]),
                }
            } else {
                Evaluated {
                    level: inner.level,
                    eta: windows(&inner.eta, count)?,
                }
            }
        }
        NodeKind::Conditional { test, subtree } => {
            let inner = evaluate(subtree, params)?;
            if test.eval(params)? != 0 {
                inner
            } else {
                Evaluated {
                    level: inner.level,
                    eta: EtaValues(vec![0; inner.eta.len()]),
                }
            }
        }
    };
    if result.eta.is_empty() {
        return Err(GenError::EmptyEtaVector(node.id()).into());
    }
    Ok(result)
}

fn slot(eta: &EtaValues, i: usize) -> i64 {
    let slots = eta.slots();
    slots[i.min(slots.len() - 1)]
}

/// Merge-sort interleave of two staircases, larger slot first; ties take
/// the right side. Once a side runs out the last taken value repeats.
pub(crate) fn merge_values(a: &EtaValues, b: &EtaValues) -> EtaValues {
    let (a, b) = (a.slots(), b.slots());
    let width = a.len() + b.len() - 1;
    let mut out = Vec::with_capacity(width);
    let (mut i, mut j) = (0, 0);
    let mut last = 0;
    while out.len() < width {
        if i < a.len() && j < b.len() {
            if a[i] > b[j] {
                last = a[i];
                i += 1;
            } else {
                last = b[j];
                j += 1;
            }
        }
        out.push(last);
    }
    EtaValues(out)
}

/// Nested-loop folding: slot `k` sums the `k`-th window of `count` body
/// slots, the body's tail standing in for slots past its end.
fn windows(body: &EtaValues, count: i64) -> Result<EtaValues, EvalError> {
    let body = body.slots();
    let width = body.len();
    let tail = body[width - 1];
    if count == 0 {
        return Ok(EtaValues(vec![0; width]));
    }
    let step = (count as usize).min(width);
    let mut out = Vec::with_capacity(width);
    let mut start = 0;
    while start < width {
        let end = (start + step).min(width);
        let mut total = checked_sum(&body[start..end])?;
        if start + step > width {
            let extra = tail
                .checked_mul((start + step - width) as i64)
                .ok_or(EvalError::Overflow)?;
            total = total.checked_add(extra).ok_or(EvalError::Overflow)?;
        }
        if step == width {
            let extra = (count - width as i64)
                .checked_mul(tail)
                .ok_or(EvalError::Overflow)?;
            total = total.checked_add(extra).ok_or(EvalError::Overflow)?;
        }
        out.push(total);
        start += step;
    }
    while out.len() < width {
        out.push(tail.checked_mul(count).ok_or(EvalError::Overflow)?);
    }
    Ok(EtaValues(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Expr, Param};

    fn eta(node: &Node, params: &ParamValues) -> Vec<i64> {
        evaluate(node, params).unwrap().eta.0
    }

    #[test]
    fn test_merge_values_interleaves() {
        let merged = merge_values(&EtaValues(vec![10, 1]), &EtaValues(vec![5]));
        assert_eq!(merged.0, vec![10, 5, 5]);
        let merged = merge_values(&EtaValues(vec![9, 6]), &EtaValues(vec![8, 7]));
        assert_eq!(merged.0, vec![9, 8, 7]);
    }

    #[test]
    fn test_flat_loop_folds_to_value() {
        let body = Node::constant(LoopLevel::Loop(0), [20, 10]);
        let tree = Node::bounded_loop(body, 0, Bound::param(Param::P0.into()));
        let at = |v| eta(&tree, &ParamValues::new().with(Param::P0, v));
        assert_eq!(at(0), vec![0]);
        assert_eq!(at(1), vec![20]);
        assert_eq!(at(4), vec![20 + 10 * 3]);
    }

    #[test]
    fn test_nested_loop_windows() {
        let body = Node::constant(LoopLevel::Loop(0), [9, 5, 4]);
        let tree = Node::bounded_loop(body, 1, Bound::literal(2));
        let result = evaluate(&tree, &ParamValues::new()).unwrap();
        assert_eq!(result.level, LoopLevel::Loop(0));
        // windows [9, 5], [4, 4*1], then tail * 2
        assert_eq!(result.eta.0, vec![14, 8, 8]);
    }

    #[test]
    fn test_nested_loop_terminal_window() {
        let body = Node::constant(LoopLevel::Loop(0), [9, 5]);
        let tree = Node::bounded_loop(body, 1, Bound::literal(4));
        // bound >= 2: slot 0 = 9 + 5 + (4 - 2) * 5, slot 1 = 5 * 4
        assert_eq!(eta(&tree, &ParamValues::new()), vec![24, 20]);
    }

    #[test]
    fn test_negative_bound_rejected() {
        let tree = Node::bounded_loop(
            Node::constant(LoopLevel::Loop(3), [1]),
            3,
            Bound::param(Expr::parse("param_0 - 5").unwrap()),
        );
        let err = evaluate(&tree, &ParamValues::new().with(Param::P0, 1)).unwrap_err();
        assert_eq!(err, EvalError::NegativeBound { loop_id: 3, value: -4 });
    }

    #[test]
    fn test_body_level_above_loop_rejected() {
        let tree = Node::bounded_loop(
            Node::sequence(vec![Node::constant(LoopLevel::Loop(7), [4, 1])]),
            3,
            Bound::literal(2),
        );
        assert_eq!(
            evaluate(&tree, &ParamValues::new()).unwrap_err(),
            EvalError::Malformed(GenError::LevelOrder {
                loop_id: 3,
                body_level: LoopLevel::Loop(7),
            })
        );
    }

    #[test]
    fn test_large_costs_overflow() {
        let big = 1i64 << 62;
        let nested = Node::bounded_loop(
            Node::constant(LoopLevel::Loop(0), [big, big]),
            1,
            Bound::literal(2),
        );
        assert_eq!(evaluate(&nested, &ParamValues::new()), Err(EvalError::Overflow));

        let flat = Node::bounded_loop(Node::constant(LoopLevel::Loop(2), [big]), 2, Bound::literal(4));
        assert_eq!(evaluate(&flat, &ParamValues::new()), Err(EvalError::Overflow));
    }

    #[test]
    fn test_conditional_zeroes_slots() {
        let tree = Node::conditional(
            Expr::parse("param_1 > 2").unwrap(),
            Node::constant(LoopLevel::Top, [4, 3]),
        );
        assert_eq!(eta(&tree, &ParamValues::new().with(Param::P1, 3)), vec![4, 3]);
        assert_eq!(eta(&tree, &ParamValues::new().with(Param::P1, 2)), vec![0, 0]);
    }

    #[test]
    fn test_empty_constant_rejected() {
        let tree = Node::constant(LoopLevel::Top, Vec::new());
        assert!(matches!(
            evaluate(&tree, &ParamValues::new()),
            Err(EvalError::Malformed(GenError::EmptyEtaVector(_)))
        ));
    }
}
