use cadenza_codegen::{
    test_util::{TestExpr, TestLowering, WordPacker},
    CallGenerator, CallSignature, SignatureTable, TableResolver,
};
use cadenza_ir::{IrNode, OpKind};

pub fn generator() -> CallGenerator<'static, TestExpr> {
    CallGenerator::new(&TestLowering, &TableResolver, &WordPacker)
}

pub fn table(sigs: impl IntoIterator<Item = CallSignature>) -> SignatureTable {
    let mut table = SignatureTable::new();
    for sig in sigs {
        table.insert(sig);
    }
    table
}

/// Offsets addressed by the `mload`/`mstore` children of `node` matching `op`.
pub fn offsets(nodes: &[IrNode], op: OpKind) -> Vec<u64> {
    nodes
        .iter()
        .filter(|node| *node.op() == op)
        .map(|node| node.children()[0].as_literal().unwrap().as_u64())
        .collect()
}

pub fn jump_index(node: &IrNode) -> usize {
    node.children()
        .iter()
        .position(|child| matches!(child.op(), OpKind::Jump(_)))
        .unwrap()
}
