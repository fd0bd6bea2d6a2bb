//! Minimal collaborators for exercising the call generator without a front
//! end.
use cadenza_ir::{IrNode, Location, NodeBuilder, OpKind, Type, WORD_SIZE};

use crate::{
    services::{ArgPacker, ExprLowering, PackedArgs},
    CallSignature, CodegenError, FuncContext,
};

/// Source expressions understood by [`TestLowering`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestExpr {
    Int(u64),
    Bool(bool),
    /// Value stored in memory at `offset`.
    Mem { offset: usize, ty: Type },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TestLowering;

impl ExprLowering<TestExpr> for TestLowering {
    fn lower(&self, expr: &TestExpr, _ctx: &mut FuncContext) -> Result<IrNode, CodegenError> {
        let node = match expr {
            TestExpr::Int(value) => NodeBuilder::new(OpKind::literal(*value)).ty(Type::int128()),
            TestExpr::Bool(value) => {
                NodeBuilder::new(OpKind::literal(u64::from(*value))).ty(Type::bool())
            }
            TestExpr::Mem { offset, ty } => NodeBuilder::new(OpKind::MLoad)
                .child(IrNode::literal(*offset))
                .ty(ty.clone())
                .location(Location::Memory),
        };
        Ok(node.build()?)
    }
}

/// Packs every argument as a single word after a one-word header holding the
/// selector right-aligned.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordPacker;

impl ArgPacker for WordPacker {
    fn pack(
        &self,
        sig: &CallSignature,
        args: Vec<IrNode>,
        ctx: &mut FuncContext,
        include_abi_header: bool,
    ) -> Result<PackedArgs, CodegenError> {
        let args_size = args.len() * WORD_SIZE;
        let region = ctx.memory.grow(WORD_SIZE + args_size)?;
        let selector_offset = region.start + WORD_SIZE - 4;

        let mut setters = Vec::with_capacity(args.len() + 2);
        if include_abi_header {
            setters.push(IrNode::build(
                OpKind::MStore,
                vec![
                    IrNode::literal(region.start),
                    IrNode::literal(sig.method_id),
                ],
            )?);
        }
        for (i, arg) in args.into_iter().enumerate() {
            let offset = region.start + WORD_SIZE * (i + 1);
            setters.push(IrNode::build(
                OpKind::MStore,
                vec![IrNode::literal(offset), arg],
            )?);
        }

        let base = if include_abi_header {
            setters.push(IrNode::literal(selector_offset));
            selector_offset
        } else {
            region.start + WORD_SIZE
        };

        let node = NodeBuilder::new(OpKind::Seq)
            .children(setters)
            .location(Location::Memory)
            .build()?;
        Ok(PackedArgs {
            node,
            size: args_size + 4,
            base,
        })
    }
}
