//! Textual s-expression form of IR trees.
//!
//! A node without children prints as its op. A node whose children are all
//! leaves prints on one line. Any other node puts each child on its own line,
//! one indentation level deeper, closing on the last child's line.
use std::fmt;

use crate::IrNode;

const INDENT: &str = "    ";

pub struct NodeWriter<'a> {
    node: &'a IrNode,
    level: usize,
}

impl<'a> NodeWriter<'a> {
    pub fn new(node: &'a IrNode) -> Self {
        Self { node, level: 0 }
    }

    pub fn write(&mut self, w: &mut impl fmt::Write) -> fmt::Result {
        self.write_node(self.node, w)
    }

    pub fn dump_string(&mut self) -> String {
        let mut s = String::new();
        // Writing into a `String` never fails.
        let _ = self.write(&mut s);
        s
    }

    fn write_node(&mut self, node: &IrNode, w: &mut impl fmt::Write) -> fmt::Result {
        let children = node.children();
        if children.is_empty() {
            return write!(w, "{}", node.op());
        }

        write!(w, "({}", node.op().as_text())?;
        if children.iter().all(|child| child.children().is_empty()) {
            for child in children {
                write!(w, " {}", child.op())?;
            }
            return write!(w, ")");
        }

        self.level += 1;
        for child in children {
            self.newline(w)?;
            self.write_node(child, w)?;
        }
        self.level -= 1;
        write!(w, ")")
    }

    fn newline(&self, w: &mut impl fmt::Write) -> fmt::Result {
        writeln!(w)?;
        for _ in 0..self.level {
            w.write_str(INDENT)?;
        }
        Ok(())
    }
}

impl fmt::Display for IrNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        NodeWriter::new(self).write(f)
    }
}

impl IrNode {
    pub fn dump_string(&self) -> String {
        NodeWriter::new(self).dump_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::{op::Label, IrNode, OpKind};

    fn node(op: OpKind, children: Vec<IrNode>) -> IrNode {
        IrNode::build(op, children).unwrap()
    }

    #[test]
    fn flat_node() {
        let store = node(OpKind::MStore, vec![IrNode::literal(320u64), IrNode::pass()]);
        assert_eq!(store.dump_string(), "(mstore 320 pass)");
    }

    #[test]
    fn nested_node() {
        let ret = node(
            OpKind::Add,
            vec![node(OpKind::Pc, vec![]), IrNode::literal(6u64)],
        );
        let seq = node(
            OpKind::SeqUnchecked,
            vec![
                ret,
                node(OpKind::Jump(Label::new("priv_9")), vec![]),
                node(OpKind::JumpDest, vec![]),
                node(
                    OpKind::Seq,
                    vec![node(OpKind::MLoad, vec![IrNode::literal(64u64)])],
                ),
            ],
        );

        insta::assert_snapshot!(seq.dump_string(), @r"
        (seq_unchecked
            (add pc 6)
            (goto priv_9)
            jumpdest
            (seq
                (mload 64)))
        ");
    }
}
