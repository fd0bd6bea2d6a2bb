//! Bump allocation of linear memory for one function.
use cadenza_ir::WORD_SIZE;

use crate::CodegenError;

/// Memory below this offset is reserved for the runtime's scratch words.
pub const RESERVED_MEMORY: usize = 320;

/// A word-aligned byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRegion {
    pub start: usize,
    pub end: usize,
}

impl MemoryRegion {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Start offsets of the words in the region, ascending.
    pub fn words(&self) -> impl DoubleEndedIterator<Item = usize> {
        (self.start..self.end).step_by(WORD_SIZE)
    }
}

/// Hands out monotonically increasing regions. Nothing is ever freed; the
/// allocator is reset between functions instead.
#[derive(Debug, Clone)]
pub struct MemoryAllocator {
    base: usize,
    next_free: usize,
}

impl MemoryAllocator {
    pub fn new(base: usize) -> Self {
        Self {
            base,
            next_free: base,
        }
    }

    /// Returns the next unused offset.
    pub fn current_offset(&self) -> usize {
        self.next_free
    }

    /// Reserves `size` bytes.
    ///
    /// # Errors
    /// [`CodegenError::Alignment`] if `size` is not a multiple of the word
    /// size, [`CodegenError::MemoryOverflow`] if the region would end past
    /// `usize::MAX`. The allocator is left untouched in both cases.
    pub fn grow(&mut self, size: usize) -> Result<MemoryRegion, CodegenError> {
        if size % WORD_SIZE != 0 {
            return Err(CodegenError::Alignment { size });
        }

        let start = self.next_free;
        let end = start
            .checked_add(size)
            .ok_or(CodegenError::MemoryOverflow {
                offset: start,
                size,
            })?;
        self.next_free = end;
        log::trace!("memory grown by {size} bytes: [{start}, {end})");
        Ok(MemoryRegion { start, end })
    }

    /// Rewinds to the base offset for the next function.
    pub fn reset(&mut self) {
        self.next_free = self.base;
    }
}

impl Default for MemoryAllocator {
    fn default() -> Self {
        Self::new(RESERVED_MEMORY)
    }
}
