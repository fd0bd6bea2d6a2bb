pub mod call;
pub mod config;
pub mod context;
pub mod frame;
pub mod memory;
pub mod services;
pub mod signature;
pub mod test_util;

mod error;

pub use call::{CallExpr, CallGenerator, ResolvedCall};
pub use config::{CodegenConfig, GapPolicy};
pub use context::FuncContext;
pub use error::{CodegenError, FrameDefect};
pub use frame::{VarRef, VariableFrame, VariableSlot};
pub use memory::{MemoryAllocator, MemoryRegion};
pub use services::{ArgPacker, ExprLowering, PackedArgs, SignatureResolver};
pub use signature::{CallSignature, SignatureTable, TableResolver};
