use super::{GenError, Generated, Generator};
use crate::ir::{Bound, Cond, LoopLevel, Node, Stmt, Value, Var};

impl Generator<'_> {
    pub(super) fn bounded_loop(
        &mut self,
        body: &Node,
        id: u32,
        bound: &Bound,
    ) -> Result<Generated, GenError> {
        if !self.loops.insert(id) {
            return Err(GenError::DuplicateLoop(id));
        }
        let inner = self.generate(body)?;
        if inner.level > LoopLevel::Loop(id) {
            return Err(GenError::LevelOrder {
                loop_id: id,
                body_level: inner.level,
            });
        }

        let bound_var = self.sink.declare_variable(format!("loop_{}_bound", id));
        let bound_value = match bound {
            Bound::Literal(n) => Value::Int(i64::from(*n)),
            Bound::Param(expr) => {
                self.sink.declare_parameters(expr);
                Value::Expr(expr.clone())
            }
        };
        self.sink.emit(Stmt::assign(&bound_var, bound_value));

        if inner.level == LoopLevel::Loop(id) {
            Ok(self.fold_flat(id, &bound_var, &inner.eta))
        } else {
            Ok(self.fold_nested(id, &bound_var, inner))
        }
    }

    /// The body only varies with this loop, so the whole loop collapses to
    /// one settled value: the body's staircase evaluated at the bound.
    fn fold_flat(&mut self, id: u32, bound: &Var, body: &[Var]) -> Generated {
        let result = self.sink.declare_variable(format!("loop_{}_eta_0", id));
        let last = body.len() - 1;

        for i in 0..last {
            self.sink.emit(Stmt::IfOnly {
                cond: Cond::Eq(bound.clone(), i as i64),
                then_body: vec![Stmt::assign(&result, Value::sum_of(&body[..i]))],
            });
        }

        let mut terms: Vec<Value> = body[..last].iter().map(Value::var).collect();
        terms.push(Value::mul(
            Value::var(&body[last]),
            Value::sub(Value::var(bound), Value::Int(last as i64)),
        ));
        self.sink.emit(Stmt::IfOnly {
            cond: Cond::AtLeast(bound.clone(), last as i64),
            then_body: vec![Stmt::assign(&result, Value::sum(terms))],
        });

        Generated {
            level: LoopLevel::Top,
            eta: vec![result],
        }
    }

    /// The body still depends on an enclosing loop. Slot `k` of the result
    /// is what this loop costs during the enclosing loop's iteration `k`
    /// when it runs `bound` times per iteration: consecutive windows of
    /// `bound` body slots, with the body's tail repeating past its end.
    fn fold_nested(&mut self, id: u32, bound: &Var, inner: Generated) -> Generated {
        let body = &inner.eta;
        let width = body.len();
        let tail = &body[width - 1];
        let result: Vec<Var> = (0..width)
            .map(|k| self.sink.declare_variable(format!("loop_{}_eta_{}", id, k)))
            .collect();

        for i in 0..=width {
            let terminal = i == width;
            let (cond, count) = if terminal {
                (Cond::AtLeast(bound.clone(), i as i64), Value::var(bound))
            } else {
                (Cond::Eq(bound.clone(), i as i64), Value::Int(i as i64))
            };

            let mut then_body = Vec::with_capacity(width);
            if i == 0 {
                for slot in &result {
                    then_body.push(Stmt::assign(slot, Value::Int(0)));
                }
            } else {
                let mut slots = result.iter();
                let mut start = 0;
                while start < width {
                    let Some(slot) = slots.next() else { break };
                    let end = (start + i).min(width);
                    let mut terms: Vec<Value> = body[start..end].iter().map(Value::var).collect();
                    if start + i > width {
                        let overflow = (start + i - width) as i64;
                        terms.push(Value::mul(Value::var(tail), Value::Int(overflow)));
                    }
                    if terminal {
                        terms.push(Value::mul(
                            Value::sub(Value::var(bound), Value::Int(i as i64)),
                            Value::var(tail),
                        ));
                    }
                    then_body.push(Stmt::assign(slot, Value::sum(terms)));
                    start += i;
                }
                for slot in slots {
                    then_body.push(Stmt::assign(slot, Value::mul(Value::var(tail), count.clone())));
                }
            }

            self.sink.emit(Stmt::IfOnly { cond, then_body });
        }

        Generated {
            level: inner.level,
            eta: result,
        }
    }
}
