use cadenza_ir::{MalformedNode, SourcePos, Type};
use thiserror::Error;

/// Errors that abort the compilation of the current function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("memory misalignment: cannot grow by {size} bytes, only multiples of 32 are supported")]
    Alignment { size: usize },

    #[error("memory overflow: cannot grow by {size} bytes past offset {offset}")]
    MemoryOverflow { offset: usize, size: usize },

    #[error("type `{ty}` does not fit in memory")]
    TypeTooLarge { ty: Type },

    #[error(
        "may not call non-constant function `{method}` within a constant function{}",
        at(.pos)
    )]
    ConstancyViolation {
        method: String,
        pos: Option<SourcePos>,
    },

    #[error("no matching signature for `{method}`: {detail}")]
    NoMatchingSignature { method: String, detail: String },

    #[error("internal code generation error: {0}")]
    MalformedNode(#[from] MalformedNode),

    #[error("invalid layout of local variable `{name}`: {defect}")]
    InvalidFrame { name: String, defect: FrameDefect },
}

/// Why a variable slot cannot be part of the saved locals span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameDefect {
    #[error("position {position} is not word aligned")]
    Misaligned { position: usize },

    #[error("overlaps the previous slot ending at {prev_end}")]
    Overlap { prev_end: usize },

    #[error("leaves a gap after the previous slot ending at {prev_end}")]
    Gap { prev_end: usize },

    #[error("extends past the allocated memory ending at {allocated_end}")]
    Unallocated { allocated_end: usize },
}

fn at(pos: &Option<SourcePos>) -> String {
    match pos {
        Some(pos) => format!(" (at {pos})"),
        None => String::new(),
    }
}
