//! This module contains the [`Visitor`] trait and pre-order traversal of IR
//! trees.
use crate::{op::OpKind, IrNode};

pub trait Visitable {
    fn accept(&self, visitor: &mut dyn Visitor);
}

#[allow(unused_variables)]
pub trait Visitor {
    fn visit_node(&mut self, node: &IrNode) {
        walk_node(self, node);
    }

    fn visit_op(&mut self, op: &OpKind) {}
}

/// Visits the op of `node`, then each child in order.
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, node: &IrNode) {
    visitor.visit_op(node.op());
    for child in node.children() {
        visitor.visit_node(child);
    }
}

impl Visitable for IrNode {
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_node(self);
    }
}

/// Depth-first, parent-before-children iterator over a tree.
pub struct Preorder<'a> {
    stack: Vec<&'a IrNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a IrNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

impl IrNode {
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct OpCollector(Vec<&'static str>);

    impl Visitor for OpCollector {
        fn visit_op(&mut self, op: &OpKind) {
            self.0.push(op.as_text());
        }
    }

    fn sample() -> IrNode {
        let load = IrNode::build(OpKind::MLoad, vec![IrNode::literal(320u64)]).unwrap();
        let store =
            IrNode::build(OpKind::MStore, vec![IrNode::literal(352u64), IrNode::pass()]).unwrap();
        IrNode::build(OpKind::SeqUnchecked, vec![load, store]).unwrap()
    }

    #[test]
    fn visitor_and_preorder_agree() {
        let node = sample();
        let mut collector = OpCollector::default();
        node.accept(&mut collector);

        let preorder: Vec<_> = node.preorder().map(|n| n.op().as_text()).collect();
        assert_eq!(collector.0, preorder);
        assert_eq!(
            preorder,
            ["seq_unchecked", "mload", "literal", "mstore", "literal", "pass"]
        );
    }
}
