//! Collaborators the call-site generator relies on.
//!
//! The front end provides these; [`crate::test_util`] has minimal versions.
use cadenza_ir::{IrNode, SourcePos};

use crate::{signature::SignatureTable, CallSignature, CodegenError, FuncContext};

/// Lowers a source expression to an IR node.
pub trait ExprLowering<E> {
    fn lower(&self, expr: &E, ctx: &mut FuncContext) -> Result<IrNode, CodegenError>;
}

/// Resolves the callee of a call, using the lowered arguments to pick among
/// overloads.
pub trait SignatureResolver {
    fn lookup(
        &self,
        sigs: &SignatureTable,
        method: &str,
        args: &[IrNode],
        pos: Option<SourcePos>,
        ctx: &FuncContext,
    ) -> Result<CallSignature, CodegenError>;
}

/// Result of serializing call arguments into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedArgs {
    /// Node writing the arguments. With an ABI header it also yields the
    /// offset of the packed data.
    pub node: IrNode,
    /// Packed size in bytes, counting the 4 selector bytes whether or not the
    /// header was written.
    pub size: usize,
    /// Offset of the packed data. Without a header it points at the first
    /// argument word.
    pub base: usize,
}

/// Serializes lowered arguments into a fresh memory region.
pub trait ArgPacker {
    fn pack(
        &self,
        sig: &CallSignature,
        args: Vec<IrNode>,
        ctx: &mut FuncContext,
        include_abi_header: bool,
    ) -> Result<PackedArgs, CodegenError>;
}
