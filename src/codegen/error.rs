use std::fmt;

use crate::diagnostic::Diagnostic;
use crate::ir::{LoopLevel, NodeId};
use crate::span::Span;

/// Why a tree cannot be turned into an evaluation routine.
///
/// Generation stops at the first error; whatever the sink holds at that
/// point is discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenError {
    /// An alternative over zero branches.
    MalformedAlternative,
    /// A sequence over zero children.
    EmptySequence(NodeId),
    /// A parameter reference outside `param_0` .. `param_3`.
    UnresolvedParameter(String),
    /// A bound or test expression that does not parse.
    InvalidExpression(String),
    /// The same node instance reached twice in one run.
    DoubleGeneration(NodeId),
    /// A node produced no eta slots.
    EmptyEtaVector(NodeId),
    /// Two loops share one id; their variables would collide.
    DuplicateLoop(u32),
    /// A loop body still varies with a loop that does not enclose it.
    LevelOrder { loop_id: u32, body_level: LoopLevel },
}

impl GenError {
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string(), span);
        match self {
            GenError::MalformedAlternative => {
                diag.with_help("an alternative needs at least one branch".to_string())
            }
            GenError::UnresolvedParameter(_) => diag
                .with_note("the generated routine takes at most four arguments".to_string())
                .with_help("refer to arguments as param_0, param_1, param_2 or param_3".to_string()),
            GenError::DuplicateLoop(id) => diag.with_help(format!(
                "give every loop its own id; another loop already uses {}",
                id
            )),
            GenError::LevelOrder { loop_id, .. } => diag
                .with_note(format!(
                    "loops inside loop {} must have larger ids than {}",
                    loop_id, loop_id
                ))
                .with_help("number loops from the outermost inwards".to_string()),
            GenError::DoubleGeneration(_) => diag.with_note(
                "a node is generated at most once; build a fresh node for each use".to_string(),
            ),
            _ => diag,
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::MalformedAlternative => write!(f, "alternative has no branches"),
            GenError::EmptySequence(id) => write!(f, "sequence {} has no children", id),
            GenError::UnresolvedParameter(name) => {
                write!(f, "unresolved parameter '{}'", name)
            }
            GenError::InvalidExpression(msg) => write!(f, "invalid expression {}", msg),
            GenError::DoubleGeneration(id) => write!(f, "node {} generated twice", id),
            GenError::EmptyEtaVector(id) => write!(f, "node {} has an empty eta vector", id),
            GenError::DuplicateLoop(id) => write!(f, "loop id {} used by more than one loop", id),
            GenError::LevelOrder { loop_id, body_level } => write!(
                f,
                "body of loop {} depends on loop {}, which does not enclose it",
                loop_id, body_level
            ),
        }
    }
}

impl std::error::Error for GenError {}

impl From<GenError> for Diagnostic {
    fn from(err: GenError) -> Self {
        err.to_diagnostic(Span::dummy())
    }
}
