//! Operation kinds of IR nodes.
use std::fmt;

use primitive_types::U256;

/// Every operation an IR node can carry.
///
/// Later lowering stages match on this exhaustively, so adding a variant is a
/// breaking change for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Executes children in order, discarding values left by all but the last.
    Seq,
    /// Executes children in order without discarding intermediate values.
    SeqUnchecked,
    /// Pushes a word constant.
    Literal(U256),
    /// Emits nothing. As an operand it stands for the value already on top of
    /// the stack.
    Pass,
    Add,
    /// Pushes the program counter of this instruction.
    Pc,
    /// Pushes the remaining gas.
    Gas,
    /// Pushes the address of the executing contract.
    Address,
    MLoad,
    MStore,
    /// Unconditional jump to a label.
    Jump(Label),
    JumpDest,
    /// Message call: `gas, address, value, in_offset, in_size, out_offset, out_size`.
    Call,
    /// Aborts execution when its operand is zero.
    Assert,
}

impl OpKind {
    pub fn literal(value: impl Into<U256>) -> Self {
        Self::Literal(value.into())
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Seq | Self::SeqUnchecked => Arity::Variadic,
            Self::Literal(_)
            | Self::Pass
            | Self::Pc
            | Self::Gas
            | Self::Address
            | Self::Jump(_)
            | Self::JumpDest => Arity::Exact(0),
            Self::MLoad | Self::Assert => Arity::Exact(1),
            Self::Add | Self::MStore => Arity::Exact(2),
            Self::Call => Arity::Exact(7),
        }
    }

    /// Returns `true` if every child of this op is consumed as a stack operand.
    pub fn takes_operands(&self) -> bool {
        !matches!(self.arity(), Arity::Variadic)
    }

    /// Number of values the op itself leaves on the stack.
    ///
    /// Sequences are not covered here; their valency is that of their last
    /// child, see [`IrNode::valency`](crate::IrNode::valency).
    pub fn own_valency(&self) -> u8 {
        match self {
            Self::Literal(_)
            | Self::Add
            | Self::Pc
            | Self::Gas
            | Self::Address
            | Self::MLoad
            | Self::Call => 1,
            Self::Seq
            | Self::SeqUnchecked
            | Self::Pass
            | Self::MStore
            | Self::Jump(_)
            | Self::JumpDest
            | Self::Assert => 0,
        }
    }

    /// Estimated gas of the op alone, excluding its children.
    pub fn base_gas(&self) -> u64 {
        match self {
            Self::Seq | Self::SeqUnchecked | Self::Pass => 0,
            Self::JumpDest => 1,
            Self::Pc | Self::Gas | Self::Address => 2,
            Self::Literal(_) | Self::Add | Self::MLoad | Self::MStore => 3,
            // push + jump
            Self::Jump(_) => 11,
            // iszero + push + jumpi
            Self::Assert => 16,
            Self::Call => 700,
        }
    }

    pub fn as_text(&self) -> &'static str {
        match self {
            Self::Seq => "seq",
            Self::SeqUnchecked => "seq_unchecked",
            Self::Literal(_) => "literal",
            Self::Pass => "pass",
            Self::Add => "add",
            Self::Pc => "pc",
            Self::Gas => "gas",
            Self::Address => "address",
            Self::MLoad => "mload",
            Self::MStore => "mstore",
            Self::Jump(_) => "goto",
            Self::JumpDest => "jumpdest",
            Self::Call => "call",
            Self::Assert => "assert",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Jump(label) => write!(f, "(goto {label})"),
            _ => f.write_str(self.as_text()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exact(expected) => expected == n,
            Self::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Variadic => write!(f, "any number of"),
        }
    }
}

/// Jump target symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_rules() {
        assert!(OpKind::MStore.arity().accepts(2));
        assert!(!OpKind::MStore.arity().accepts(1));
        assert!(OpKind::Call.arity().accepts(7));
        assert!(OpKind::SeqUnchecked.arity().accepts(0));
        assert!(!OpKind::Seq.takes_operands());
        assert!(OpKind::Assert.takes_operands());
    }

    #[test]
    fn display_leaf_ops() {
        assert_eq!(OpKind::literal(320u64).to_string(), "320");
        assert_eq!(OpKind::Jump(Label::new("priv_7")).to_string(), "(goto priv_7)");
        assert_eq!(OpKind::JumpDest.to_string(), "jumpdest");
    }
}
