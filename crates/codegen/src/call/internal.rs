//! Direct-jump calls to private functions.
//!
//! The callee runs in the caller's execution context and shares its memory,
//! so the caller's locals are pushed on the stack before the jump and popped
//! back afterwards. Emitted sequence:
//!
//! 1. `mload` every word of the locals span, ascending.
//! 2. Pack the arguments and `mload` every packed word, ascending.
//! 3. Push the return address, jump to the callee, `jumpdest`.
//! 4. `mstore` the returned words into the output placeholder, ascending.
//! 5. `mstore` every word of the locals span, descending.
//! 6. The return value expression.
use cadenza_ir::{ceil32, IrNode, Location, NodeBuilder, OpKind, WORD_SIZE};
use smallvec::SmallVec;

use super::{leaf, mload, mstore_top, CallGenerator, ResolvedCall};
use crate::{CodegenError, FuncContext};

/// Size of the selector that is not pushed for direct jumps.
const SELECTOR_SIZE: usize = 4;

impl<E> CallGenerator<'_, E> {
    pub(super) fn lower_internal(
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

        // Slots past the allocator's offset would collide with the return
        // placeholder allocated below.
        let saved: SmallVec<[usize; 8]> = ctx
            .vars
            .live_span(ctx.config.gap_policy, ctx.memory.current_offset())?
            .map(|span| span.words().collect())
            .unwrap_or_default();

        let mut seq = saved
            .iter()
            .map(|&offset| mload(offset))
            .collect::<Result<Vec<_>, _>>()?;

        let mut arg_words = 0;
        if !args.is_empty() {
            let packed = self.packer.pack(&sig, args, ctx, false)?;
            let end = ceil32(packed.size.saturating_sub(SELECTOR_SIZE))
                .and_then(|len| packed.base.checked_add(len))
                .ok_or(CodegenError::MemoryOverflow {
                    offset: packed.base,
                    size: packed.size,
                })?;
            seq.push(packed.node);
            for offset in (packed.base..end).step_by(WORD_SIZE) {
                seq.push(mload(offset)?);
                arg_words += 1;
            }
        }

        let return_addr = IrNode::build(
            OpKind::Add,
            vec![
                leaf(OpKind::Pc)?,
                IrNode::literal(ctx.config.return_pc_offset),
            ],
        )?;
        seq.push(return_addr);
        seq.push(leaf(OpKind::Jump(ctx.config.private_label(sig.method_id)))?);
        seq.push(leaf(OpKind::JumpDest)?);

        let returner = if sig.output_type.is_some() {
            let slot = self.return_slot(&sig, ctx)?;
            for offset in (slot.offset..slot.offset + slot.size).step_by(WORD_SIZE) {
                seq.push(mstore_top(offset)?);
            }
            slot.returner
        } else {
            IrNode::pass()
        };

        for &offset in saved.iter().rev() {
            seq.push(mstore_top(offset)?);
        }
        seq.push(returner);

        log::debug!(
            "internal call to `{method}`: {} saved words, {arg_words} argument words",
            saved.len()
        );

        let mut node = NodeBuilder::new(OpKind::SeqUnchecked)
            .children(seq)
            .ty(sig.output_type)
            .location(Location::Memory)
            .pos(pos)
            .annotation(format!("internal call: {method}"))
            .build()?;
        node.add_gas(sig.gas);
        Ok(node)
    }
}
