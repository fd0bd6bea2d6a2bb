//! This module contains the IR node definition.
use std::fmt;

use primitive_types::U256;

use crate::{op::OpKind, MalformedNode, Type};

/// Where the value produced by a node lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    Stack,
    Memory,
    Storage,
    CallData,
    #[default]
    None,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stack => "stack",
            Self::Memory => "memory",
            Self::Storage => "storage",
            Self::CallData => "calldata",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

/// Source span a node was lowered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePos {
    pub line: u32,
    pub col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourcePos {
    pub fn new(line: u32, col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            line,
            col,
            end_line,
            end_col,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A node of the IR tree.
///
/// Nodes are validated on construction and immutable afterwards, except for
/// the gas estimate which may only grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrNode {
    op: OpKind,
    children: Vec<IrNode>,
    value_type: Option<Type>,
    location: Location,
    pos: Option<SourcePos>,
    gas: u64,
    annotation: Option<String>,
}

impl IrNode {
    /// Builds a node without attributes.
    pub fn build(op: OpKind, children: Vec<IrNode>) -> Result<Self, MalformedNode> {
        NodeBuilder::new(op).children(children).build()
    }

    pub fn literal(value: impl Into<U256>) -> Self {
        Self::leaf(OpKind::Literal(value.into()))
    }

    pub fn pass() -> Self {
        Self::leaf(OpKind::Pass)
    }

    fn leaf(op: OpKind) -> Self {
        debug_assert!(op.arity().accepts(0));
        let gas = op.base_gas();
        Self {
            op,
            children: Vec::new(),
            value_type: None,
            location: Location::None,
            pos: None,
            gas,
            annotation: None,
        }
    }

    pub fn op(&self) -> &OpKind {
        &self.op
    }

    pub fn children(&self) -> &[IrNode] {
        &self.children
    }

    pub fn value_type(&self) -> Option<&Type> {
        self.value_type.as_ref()
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn pos(&self) -> Option<SourcePos> {
        self.pos
    }

    pub fn gas(&self) -> u64 {
        self.gas
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Accumulates `gas` into the estimate of this node, saturating at
    /// `u64::MAX`.
    pub fn add_gas(&mut self, gas: u64) {
        self.gas = self.gas.saturating_add(gas);
    }

    /// Number of values this node leaves on the stack.
    pub fn valency(&self) -> u8 {
        match self.op {
            OpKind::Seq | OpKind::SeqUnchecked => {
                self.children.last().map_or(0, IrNode::valency)
            }
            _ => self.op.own_valency(),
        }
    }

    /// Returns `true` if the node may stand in an operand position.
    pub fn is_operand(&self) -> bool {
        self.valency() == 1 || matches!(self.op, OpKind::Pass)
    }

    /// Returns the constant pushed by this node, if it is a literal.
    pub fn as_literal(&self) -> Option<U256> {
        match self.op {
            OpKind::Literal(value) => Some(value),
            _ => None,
        }
    }
}

/// Builder of [`IrNode`]. Validation happens in [`NodeBuilder::build`].
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    op: OpKind,
    children: Vec<IrNode>,
    value_type: Option<Type>,
    location: Location,
    pos: Option<SourcePos>,
    annotation: Option<String>,
}

impl NodeBuilder {
    pub fn new(op: OpKind) -> Self {
        Self {
            op,
            children: Vec::new(),
            value_type: None,
            location: Location::None,
            pos: None,
            annotation: None,
        }
    }

    pub fn child(mut self, child: IrNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = IrNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn ty(mut self, ty: impl Into<Option<Type>>) -> Self {
        self.value_type = ty.into();
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn pos(mut self, pos: impl Into<Option<SourcePos>>) -> Self {
        self.pos = pos.into();
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn build(self) -> Result<IrNode, MalformedNode> {
        let Self {
            op,
            children,
            value_type,
            location,
            pos,
            annotation,
        } = self;

        let arity = op.arity();
        if !arity.accepts(children.len()) {
            return Err(MalformedNode::Arity {
                op: op.as_text(),
                expected: arity,
                found: children.len(),
            });
        }

        if op.takes_operands() {
            if let Some(index) = children.iter().position(|child| !child.is_operand()) {
                return Err(MalformedNode::NotAnOperand {
                    op: op.as_text(),
                    index,
                });
            }
        }

        let gas = children
            .iter()
            .map(IrNode::gas)
            .fold(op.base_gas(), u64::saturating_add);
        Ok(IrNode {
            op,
            children,
            value_type,
            location,
            pos,
            gas,
            annotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Arity;

    fn mload(offset: u64) -> IrNode {
        IrNode::build(OpKind::MLoad, vec![IrNode::literal(offset)]).unwrap()
    }

    #[test]
    fn mstore_requires_offset_and_value() {
        let err = IrNode::build(OpKind::MStore, vec![IrNode::literal(32u64)]).unwrap_err();
        assert_eq!(
            err,
            MalformedNode::Arity {
                op: "mstore",
                expected: Arity::Exact(2),
                found: 1,
            }
        );

        let node = IrNode::build(OpKind::MStore, vec![IrNode::literal(32u64), IrNode::pass()]);
        assert!(node.is_ok());
    }

    #[test]
    fn operand_must_produce_value() {
        let jumpdest = IrNode::build(OpKind::JumpDest, vec![]).unwrap();
        let err = IrNode::build(OpKind::Assert, vec![jumpdest]).unwrap_err();
        assert_eq!(err, MalformedNode::NotAnOperand { op: "assert", index: 0 });
    }

    #[test]
    fn gas_sums_children() {
        let add = IrNode::build(OpKind::Add, vec![mload(0), IrNode::literal(1u64)]).unwrap();
        // add(3) + mload(3) + literal(3) + literal(3)
        assert_eq!(add.gas(), 12);

        let mut seq = IrNode::build(OpKind::Seq, vec![add, IrNode::pass()]).unwrap();
        assert_eq!(seq.gas(), 12);
        seq.add_gas(100);
        assert_eq!(seq.gas(), 112);
    }

    #[test]
    fn gas_saturates() {
        let mut heavy = IrNode::literal(1u64);
        heavy.add_gas(u64::MAX);
        assert_eq!(heavy.gas(), u64::MAX);

        let seq = IrNode::build(OpKind::Seq, vec![heavy, mload(0)]).unwrap();
        assert_eq!(seq.gas(), u64::MAX);

        let mut seq = seq;
        seq.add_gas(1);
        assert_eq!(seq.gas(), u64::MAX);
    }

    #[test]
    fn seq_valency_follows_last_child() {
        let seq = IrNode::build(OpKind::Seq, vec![IrNode::pass(), mload(64)]).unwrap();
        assert_eq!(seq.valency(), 1);
        assert!(seq.is_operand());

        let empty = IrNode::build(OpKind::SeqUnchecked, vec![]).unwrap();
        assert_eq!(empty.valency(), 0);
        assert!(!empty.is_operand());
    }

    #[test]
    fn builder_attributes() {
        let pos = SourcePos::new(3, 4, 3, 12);
        let node = NodeBuilder::new(OpKind::Seq)
            .child(mload(320))
            .ty(Type::int128())
            .location(Location::Memory)
            .pos(pos)
            .annotation("load x")
            .build()
            .unwrap();

        assert_eq!(node.value_type(), Some(&Type::int128()));
        assert_eq!(node.location(), Location::Memory);
        assert_eq!(node.pos(), Some(pos));
        assert_eq!(node.annotation(), Some("load x"));
        assert_eq!(node.children().len(), 1);
    }
}
