//! Cost-tree intermediate representation.
//!
//! A cost tree describes the control-flow shape of a procedure: constant
//! blocks, sequences, mutually exclusive alternatives, bounded loops and
//! parameter-gated blocks. Generation turns a tree into a straight-line
//! program over named eta slots (see [`stmt`]).

pub mod expr;
pub mod stmt;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::codegen::GenError;

pub use expr::{BinOp, Expr, UnOp};
pub use stmt::{Cond, Program, Stmt, Value, Var};

// ─── Loop levels ──────────────────────────────────────────────────

/// The loop scope an eta vector is still a function of.
///
/// `Top` is the whole program and orders below every loop. Loop ids are
/// assigned by the caller in nesting order (outer loops get smaller ids),
/// so the maximum over a node's children is their least upper bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoopLevel {
    Top,
    Loop(u32),
}

impl fmt::Display for LoopLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopLevel::Top => write!(f, "TOP"),
            LoopLevel::Loop(id) => write!(f, "{}", id),
        }
    }
}

// ─── Parameters ───────────────────────────────────────────────────

/// A formal argument of the generated routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    P0,
    P1,
    P2,
    P3,
}

impl Param {
    pub const ALL: [Param; 4] = [Param::P0, Param::P1, Param::P2, Param::P3];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: u64) -> Result<Param, GenError> {
        match index {
            0 => Ok(Param::P0),
            1 => Ok(Param::P1),
            2 => Ok(Param::P2),
            3 => Ok(Param::P3),
            _ => Err(GenError::UnresolvedParameter(format!("param_{}", index))),
        }
    }

    /// Resolve a `param_<n>` identifier. Anything else is unresolved.
    pub fn from_name(name: &str) -> Result<Param, GenError> {
        name.strip_prefix("param_")
            .and_then(|digits| digits.parse::<u64>().ok())
            .ok_or_else(|| GenError::UnresolvedParameter(name.to_string()))
            .and_then(Param::from_index)
    }

    pub fn name(self) -> &'static str {
        match self {
            Param::P0 => "param_0",
            Param::P1 => "param_1",
            Param::P2 => "param_2",
            Param::P3 => "param_3",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Loop bounds ──────────────────────────────────────────────────

/// Where a loop's trip count comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    Literal(u32),
    Param(Expr),
}

impl Bound {
    pub fn literal(count: u32) -> Self {
        Bound::Literal(count)
    }

    pub fn param(expr: Expr) -> Self {
        Bound::Param(expr)
    }

    /// Parse a parameter expression such as `"param_0 * 2"`.
    pub fn parse_param(text: &str) -> Result<Self, GenError> {
        Expr::parse(text).map(Bound::Param)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Literal(n) => write!(f, "ConstantBound({})", n),
            Bound::Param(expr) => write!(f, "ParamBound(\"{}\")", expr),
        }
    }
}

// ─── Nodes ────────────────────────────────────────────────────────

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(0);

/// Identity of a node instance. Clones share it, which is how a node
/// reachable twice from one root is detected during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    pub kind: NodeKind,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Literal eta vector settled at `level`.
    Constant { level: LoopLevel, values: Vec<i64> },
    /// Children executed one after the other.
    Sequence { children: Vec<Node> },
    /// Worst case of two mutually exclusive branches.
    Alternative { left: Box<Node>, right: Box<Node> },
    /// `body` repeated `bound` times; `id` is this loop's own level.
    Loop {
        body: Box<Node>,
        id: u32,
        bound: Bound,
    },
    /// `subtree` only costs anything when `test` is non-zero.
    Conditional { test: Expr, subtree: Box<Node> },
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::fresh(),
            kind,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn constant(level: LoopLevel, values: impl Into<Vec<i64>>) -> Self {
        Self::new(NodeKind::Constant {
            level,
            values: values.into(),
        })
    }

    /// Zero cost, settled at the top level.
    pub fn zero() -> Self {
        Self::constant(LoopLevel::Top, [0])
    }

    pub fn sequence(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Sequence { children })
    }

    /// Worst case of N branches, reduced to a balanced tree of binary
    /// alternatives. A single branch is paired with [`Node::zero`].
    pub fn alternative(mut children: Vec<Node>) -> Result<Self, GenError> {
        match children.len() {
            0 => Err(GenError::MalformedAlternative),
            1 => {
                let only = children.remove(0);
                Ok(Self::binary_alternative(only, Self::zero()))
            }
            n => {
                let right = children.split_off(n / 2);
                let left = Self::reduce_half(children)?;
                let right = Self::reduce_half(right)?;
                Ok(Self::binary_alternative(left, right))
            }
        }
    }

    fn reduce_half(mut half: Vec<Node>) -> Result<Self, GenError> {
        if half.len() == 1 {
            Ok(half.remove(0))
        } else {
            Self::alternative(half)
        }
    }

    pub fn binary_alternative(left: Node, right: Node) -> Self {
        Self::new(NodeKind::Alternative {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn bounded_loop(body: Node, id: u32, bound: Bound) -> Self {
        Self::new(NodeKind::Loop {
            body: Box::new(body),
            id,
            bound,
        })
    }

    pub fn conditional(test: Expr, subtree: Node) -> Self {
        Self::new(NodeKind::Conditional {
            test,
            subtree: Box::new(subtree),
        })
    }

    /// Number of nodes in the tree rooted here.
    pub fn size(&self) -> usize {
        1 + match &self.kind {
            NodeKind::Constant { .. } => 0,
            NodeKind::Sequence { children } => children.iter().map(Node::size).sum(),
            NodeKind::Alternative { left, right } => left.size() + right.size(),
            NodeKind::Loop { body, .. } => body.size(),
            NodeKind::Conditional { subtree, .. } => subtree.size(),
        }
    }
}

/// Prints the constructor notation accepted by the parser.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Constant { level, values } => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "Constant({}, [{}])", level, values.join(", "))
            }
            NodeKind::Sequence { children } => {
                write!(f, "Seq([")?;
                write_list(f, children)?;
                write!(f, "])")
            }
            NodeKind::Alternative { left, right } => write!(f, "Alt([{}, {}])", left, right),
            NodeKind::Loop { body, id, bound } => write!(f, "Loop({}, {}, {})", body, id, bound),
            NodeKind::Conditional { test, subtree } => {
                write!(f, "Conditional(\"{}\", {})", test, subtree)
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}
