//! Local variables of the function being compiled.
use cadenza_ir::{Type, WORD_SIZE};
use cranelift_entity::{entity_impl, PrimaryMap};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{config::GapPolicy, memory::MemoryRegion, CodegenError, FrameDefect};

/// An opaque reference to a declared variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Copy, Hash)]
pub struct VarRef(u32);
entity_impl!(VarRef);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSlot {
    pub position: usize,
    pub size_in_words: usize,
    pub ty: Type,
}

impl VariableSlot {
    pub fn new(position: usize, size_in_words: usize, ty: Type) -> Self {
        Self {
            position,
            size_in_words,
            ty,
        }
    }

    /// First byte past the slot, or `None` if the slot runs past `usize::MAX`.
    pub fn end(&self) -> Option<usize> {
        self.size_in_words
            .checked_mul(WORD_SIZE)
            .and_then(|size| self.position.checked_add(size))
    }
}

#[derive(Debug, Clone)]
struct FrameEntry {
    name: String,
    slot: VariableSlot,
}

#[derive(Debug, Default)]
pub struct VariableFrame {
    entries: PrimaryMap<VarRef, FrameEntry>,
    names: FxHashMap<String, VarRef>,
}

impl VariableFrame {
    /// # Panics
    /// Panics if a variable named `name` is already declared.
    pub fn declare(&mut self, name: &str, slot: VariableSlot) -> VarRef {
        match self.names.entry(name.to_string()) {
            std::collections::hash_map::Entry::Occupied(_) => {
                panic!("duplicate variable `{name}`");
            }
            std::collections::hash_map::Entry::Vacant(v) => {
                let var = self.entries.push(FrameEntry {
                    name: name.to_string(),
                    slot,
                });
                v.insert(var);
                var
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&VariableSlot> {
        self.names.get(name).map(|&var| &self.entries[var].slot)
    }

    pub fn slot(&self, var: VarRef) -> &VariableSlot {
        &self.entries[var].slot
    }

    pub fn name(&self, var: VarRef) -> &str {
        &self.entries[var].name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableSlot)> {
        self.entries
            .values()
            .map(|entry| (entry.name.as_str(), &entry.slot))
    }

    /// Computes the memory span holding every declared variable.
    ///
    /// Returns `None` when there is nothing to preserve.
    ///
    /// # Errors
    /// [`CodegenError::InvalidFrame`] if a slot is misaligned, overlaps
    /// another slot, or ends past `allocated_end`. Holes between slots are an
    /// error too when `policy` rejects them.
    pub fn live_span(
        &self,
        policy: GapPolicy,
        allocated_end: usize,
    ) -> Result<Option<MemoryRegion>, CodegenError> {
        let mut entries: SmallVec<[&FrameEntry; 16]> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.slot.position);

        let mut span: Option<MemoryRegion> = None;
        for entry in entries {
            let slot = &entry.slot;
            let defect = |defect| CodegenError::InvalidFrame {
                name: entry.name.clone(),
                defect,
            };

            if slot.position % WORD_SIZE != 0 {
                return Err(defect(FrameDefect::Misaligned {
                    position: slot.position,
                }));
            }

            let end = slot
                .end()
                .filter(|&end| end <= allocated_end)
                .ok_or_else(|| defect(FrameDefect::Unallocated { allocated_end }))?;

            let start = match span {
                None => slot.position,
                Some(MemoryRegion { start, end: prev_end }) => {
                    if slot.position < prev_end {
                        return Err(defect(FrameDefect::Overlap { prev_end }));
                    }
                    if slot.position > prev_end && policy == GapPolicy::Reject {
                        return Err(defect(FrameDefect::Gap { prev_end }));
                    }
                    start
                }
            };
            span = Some(MemoryRegion { start, end });
        }

        Ok(span.filter(|span| !span.is_empty()))
    }
}
