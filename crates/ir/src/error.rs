use thiserror::Error;

use crate::op::Arity;

/// An IR node violated the shape rules of its operation.
///
/// This always indicates a bug in the code generator that built the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedNode {
    #[error("`{op}` takes {expected} children, found {found}")]
    Arity {
        op: &'static str,
        expected: Arity,
        found: usize,
    },

    #[error("child {index} of `{op}` does not produce a value")]
    NotAnOperand { op: &'static str, index: usize },
}
