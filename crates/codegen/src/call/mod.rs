//! Lowering of calls to functions of the same contract.
//!
//! Private callees are reached by a direct jump within the current execution
//! context (see [`internal`]); all other callees by a message call to the
//! contract itself (see [`external`]).
mod external;
mod internal;

use cadenza_ir::{IrNode, OpKind, SourcePos, TypeLayout, WordLayout, WORD_SIZE};

use crate::{
    context::byte_size,
    services::{ArgPacker, ExprLowering, SignatureResolver},
    CallSignature, CodegenError, FuncContext,
};

/// A call to a method of the contract being compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr<E> {
    pub method: String,
    pub args: Vec<E>,
    pub pos: Option<SourcePos>,
}

impl<E> CallExpr<E> {
    pub fn new(method: &str, args: Vec<E>) -> Self {
        Self {
            method: method.to_string(),
            args,
            pos: None,
        }
    }

    pub fn with_pos(mut self, pos: SourcePos) -> Self {
        self.pos = Some(pos);
        self
    }
}

/// A call whose arguments are lowered and whose callee is resolved.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    pub method: String,
    pub args: Vec<IrNode>,
    pub sig: CallSignature,
    pub pos: Option<SourcePos>,
}

pub struct CallGenerator<'a, E> {
    lowering: &'a dyn ExprLowering<E>,
    resolver: &'a dyn SignatureResolver,
    packer: &'a dyn ArgPacker,
    layout: &'a dyn TypeLayout,
}

impl<'a, E> CallGenerator<'a, E> {
    pub fn new(
        lowering: &'a dyn ExprLowering<E>,
        resolver: &'a dyn SignatureResolver,
        packer: &'a dyn ArgPacker,
    ) -> Self {
        Self {
            lowering,
            resolver,
            packer,
            layout: &WordLayout,
        }
    }

    pub fn with_layout(mut self, layout: &'a dyn TypeLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Lowers the arguments of `call` and resolves its callee.
    pub fn resolve_call(
        &self,
        call: &CallExpr<E>,
        ctx: &mut FuncContext,
    ) -> Result<ResolvedCall, CodegenError> {
        let args = call
            .args
            .iter()
            .map(|arg| self.lowering.lower(arg, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        let sig = self
            .resolver
            .lookup(ctx.sigs, &call.method, &args, call.pos, ctx)?;

        Ok(ResolvedCall {
            method: call.method.clone(),
            args,
            sig,
            pos: call.pos,
        })
    }

    /// Lowers `call` to a node yielding the memory offset of the return value,
    /// or nothing if the callee returns nothing.
    pub fn generate_call(
        &self,
        call: &CallExpr<E>,
        ctx: &mut FuncContext,
    ) -> Result<IrNode, CodegenError> {
        let resolved = self.resolve_call(call, ctx)?;
        check_constancy(&resolved, ctx)?;

        if resolved.sig.is_private {
            self.lower_internal(resolved, ctx)
        } else {
            self.lower_external(resolved, ctx)
        }
    }

    /// Reserves the memory receiving the return value of the callee.
    fn return_slot(
        &self,
        sig: &CallSignature,
        ctx: &mut FuncContext,
    ) -> Result<ReturnSlot, CodegenError> {
        let Some(ty) = &sig.output_type else {
            return Ok(ReturnSlot {
                offset: ctx.memory.current_offset(),
                size: 0,
                returner: IrNode::pass(),
            });
        };

        let size = byte_size(self.layout, ty)?;
        let offset = ctx.new_placeholder(ty, self.layout)?;
        // Byte arrays are referenced past their length word.
        let returner = if ty.is_byte_array() {
            IrNode::literal(offset + WORD_SIZE)
        } else {
            IrNode::literal(offset)
        };

        Ok(ReturnSlot {
            offset,
            size,
            returner,
        })
    }
}

struct ReturnSlot {
    offset: usize,
    size: usize,
    /// Expression yielding the value after the call.
    returner: IrNode,
}

/// A constant function may only call constant functions.
fn check_constancy(call: &ResolvedCall, ctx: &FuncContext) -> Result<(), CodegenError> {
    if ctx.is_constant && !call.sig.is_constant {
        return Err(CodegenError::ConstancyViolation {
            method: call.method.clone(),
            pos: call.pos,
        });
    }
    Ok(())
}

fn mload(offset: usize) -> Result<IrNode, CodegenError> {
    Ok(IrNode::build(OpKind::MLoad, vec![IrNode::literal(offset)])?)
}

/// Stores the value on top of the stack at `offset`.
fn mstore_top(offset: usize) -> Result<IrNode, CodegenError> {
    Ok(IrNode::build(
        OpKind::MStore,
        vec![IrNode::literal(offset), IrNode::pass()],
    )?)
}

fn leaf(op: OpKind) -> Result<IrNode, CodegenError> {
    Ok(IrNode::build(op, vec![])?)
}
