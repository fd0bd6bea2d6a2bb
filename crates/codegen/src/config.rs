use cadenza_ir::Label;

use crate::memory::RESERVED_MEMORY;

/// Byte distance from the `pc` pushed as return address to the jump
/// destination that follows the jump. The bytes in between are `pc`, `add`,
/// `push2 <label>` and `jump`; the `push1 6` operand is emitted before `pc`.
pub const RETURN_PC_OFFSET: u64 = 6;

pub const PRIVATE_LABEL_PREFIX: &str = "priv_";

/// How the saved span of local variables treats holes between slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    /// Holes are saved and restored along with the locals around them.
    Span,
    /// Holes are reported as [`FrameDefect::Gap`](crate::FrameDefect::Gap).
    Reject,
}

#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// First byte of memory handed out by the allocator.
    pub reserved_memory: usize,
    pub return_pc_offset: u64,
    pub private_label_prefix: String,
    pub gap_policy: GapPolicy,
}

impl CodegenConfig {
    /// Configuration that requires local variables to be packed back to back.
    pub fn strict() -> Self {
        Self {
            gap_policy: GapPolicy::Reject,
            ..Self::default()
        }
    }

    pub fn private_label(&self, method_id: u32) -> Label {
        Label::new(format!("{}{}", self.private_label_prefix, method_id))
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            reserved_memory: RESERVED_MEMORY,
            return_pc_offset: RETURN_PC_OFFSET,
            private_label_prefix: PRIVATE_LABEL_PREFIX.to_string(),
            gap_policy: GapPolicy::Span,
        }
    }
}
