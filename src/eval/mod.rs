//! Numeric evaluation: concrete eta values, a reference evaluator over
//! cost trees, and a machine that runs generated programs.

pub mod machine;
pub mod reference;

use std::fmt;
use std::str::FromStr;

use crate::codegen::GenError;
use crate::diagnostic::Diagnostic;
use crate::ir::Param;
use crate::span::Span;

pub use machine::Machine;
pub use reference::{evaluate, Evaluated};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    MissingParameter(Param),
    UnassignedVariable(String),
    DivisionByZero,
    Overflow,
    /// A loop bound evaluated below zero; no guard covers it.
    NegativeBound { loop_id: u32, value: i64 },
    /// The program has no trailing return.
    NoReturn,
    Malformed(GenError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::MissingParameter(p) => write!(f, "no value given for {}", p),
            EvalError::UnassignedVariable(name) => {
                write!(f, "'{}' is read before it is assigned", name)
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::Overflow => write!(f, "arithmetic overflow"),
            EvalError::NegativeBound { loop_id, value } => {
                write!(f, "loop {} has negative bound {}", loop_id, value)
            }
            EvalError::NoReturn => write!(f, "program does not return a value"),
            EvalError::Malformed(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<GenError> for EvalError {
    fn from(err: GenError) -> Self {
        EvalError::Malformed(err)
    }
}

impl From<EvalError> for Diagnostic {
    fn from(err: EvalError) -> Self {
        let diag = Diagnostic::error(format!("evaluation failed: {}", err), Span::dummy());
        match err {
            EvalError::MissingParameter(p) => {
                diag.with_help(format!("pass a value with `-p {}=VALUE`", p.index()))
            }
            EvalError::NegativeBound { .. } => {
                diag.with_note("loop bounds must be zero or more iterations".to_string())
            }
            EvalError::Malformed(err) => err.into(),
            _ => diag,
        }
    }
}

// ─── Parameter assignment ─────────────────────────────────────────

/// Values for `param_0` .. `param_3`; unset parameters are `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParamValues([Option<i64>; 4]);

impl ParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, param: Param, value: i64) -> Self {
        self.set(param, value);
        self
    }

    pub fn set(&mut self, param: Param, value: i64) {
        self.0[param.index()] = Some(value);
    }

    pub fn get(&self, param: Param) -> Option<i64> {
        self.0[param.index()]
    }

    pub fn require(&self, param: Param) -> Result<i64, EvalError> {
        self.get(param).ok_or(EvalError::MissingParameter(param))
    }
}

/// One `N=VALUE` or `param_N=VALUE` assignment, as given on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamAssignment {
    pub param: Param,
    pub value: i64,
}

impl FromStr for ParamAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected N=VALUE, got '{}'", s))?;
        let name = name.trim();
        let param = match name.parse::<u64>() {
            Ok(index) => Param::from_index(index),
            Err(_) => Param::from_name(name),
        }
        .map_err(|e| e.to_string())?;
        let value = value
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("bad value for {}: {}", param, e))?;
        Ok(ParamAssignment { param, value })
    }
}

impl FromIterator<ParamAssignment> for ParamValues {
    fn from_iter<I: IntoIterator<Item = ParamAssignment>>(iter: I) -> Self {
        let mut values = ParamValues::new();
        for a in iter {
            values.set(a.param, a.value);
        }
        values
    }
}

// ─── Concrete eta vectors ─────────────────────────────────────────

/// An eta vector with concrete slot values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EtaValues(pub Vec<i64>);

impl EtaValues {
    pub fn slots(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cost of `n` iterations: the first `len - 1` iterations cost their own
    /// slot, every later one costs the last slot.
    pub fn value(&self, n: u64) -> Result<i64, EvalError> {
        let Some(&tail) = self.0.last() else {
            return Ok(0);
        };
        let steps = self.0.len() as u64 - 1;
        if n <= steps {
            return checked_sum(&self.0[..n as usize]);
        }
        let prefix = checked_sum(&self.0[..steps as usize])?;
        let extra = i64::try_from(n - steps)
            .ok()
            .and_then(|k| k.checked_mul(tail))
            .ok_or(EvalError::Overflow)?;
        prefix.checked_add(extra).ok_or(EvalError::Overflow)
    }

    /// True when no slot is larger than the one before it.
    pub fn is_non_increasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0] >= w[1])
    }
}

pub(crate) fn checked_sum(values: &[i64]) -> Result<i64, EvalError> {
    values
        .iter()
        .try_fold(0i64, |acc, &v| acc.checked_add(v))
        .ok_or(EvalError::Overflow)
}
