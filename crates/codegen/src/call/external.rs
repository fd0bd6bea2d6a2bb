//! Message calls to the contract's own public functions.
//!
//! The call runs in a fresh execution context, so nothing of the caller needs
//! to be preserved. A failed call reverts the caller as well.
use cadenza_ir::{IrNode, Location, NodeBuilder, OpKind};

use super::{leaf, CallGenerator, ResolvedCall};
use crate::{CodegenError, FuncContext};

impl<E> CallGenerator<'_, E> {
    pub(super) fn lower_external(
        &self,
        call: ResolvedCall,
        ctx: &mut FuncContext,
    ) -> Result<IrNode, CodegenError> {
        let ResolvedCall {
            method,
            args,
            sig,
            pos,
        } = call;

        let packed = self.packer.pack(&sig, args, ctx, true)?;
        let slot = self.return_slot(&sig, ctx)?;

        let message_call = IrNode::build(
            OpKind::Call,
            vec![
                leaf(OpKind::Gas)?,
                leaf(OpKind::Address)?,
                IrNode::literal(0u64),
                packed.node,
                IrNode::literal(packed.size),
                IrNode::literal(slot.offset),
                IrNode::literal(slot.size),
            ],
        )?;
        let checked = IrNode::build(OpKind::Assert, vec![message_call])?;

        log::debug!(
            "self call to `{method}`: {} argument bytes, {} output bytes at {}",
            packed.size,
            slot.size,
            slot.offset
        );

        let mut node = NodeBuilder::new(OpKind::Seq)
            .children([checked, slot.returner])
            .ty(sig.output_type)
            .location(Location::Memory)
            .pos(pos)
            .annotation(format!("self call: {method}"))
            .build()?;
        node.add_gas(sig.gas);
        Ok(node)
    }
}
