use cadenza_ir::{Type, TypeLayout};

use crate::{
    frame::{VarRef, VariableFrame, VariableSlot},
    memory::MemoryAllocator,
    signature::SignatureTable,
    CodegenConfig, CodegenError,
};

/// State of the function currently being compiled.
///
/// Each function gets its own context; nothing here is shared between
/// compilations.
pub struct FuncContext<'a> {
    pub sigs: &'a SignatureTable,
    pub config: &'a CodegenConfig,
    pub vars: VariableFrame,
    pub memory: MemoryAllocator,
    /// Whether the function is declared constant, i.e. must not mutate state.
    pub is_constant: bool,
}

impl<'a> FuncContext<'a> {
    pub fn new(sigs: &'a SignatureTable, config: &'a CodegenConfig, is_constant: bool) -> Self {
        Self {
            sigs,
            config,
            vars: VariableFrame::default(),
            memory: MemoryAllocator::new(config.reserved_memory),
            is_constant,
        }
    }

    /// Allocates memory for a local variable and declares it.
    pub fn new_variable(
        &mut self,
        name: &str,
        ty: Type,
        layout: &dyn TypeLayout,
    ) -> Result<VarRef, CodegenError> {
        let words = layout.total_words(&ty);
        let region = self.memory.grow(byte_size(layout, &ty)?)?;
        log::debug!("variable `{name}: {ty}` at {}", region.start);
        Ok(self
            .vars
            .declare(name, VariableSlot::new(region.start, words, ty)))
    }

    /// Reserves memory for a value of type `ty` and returns its offset.
    pub fn new_placeholder(
        &mut self,
        ty: &Type,
        layout: &dyn TypeLayout,
    ) -> Result<usize, CodegenError> {
        Ok(self.memory.grow(byte_size(layout, ty)?)?.start)
    }
}

/// Size in bytes of a value of type `ty`.
pub(crate) fn byte_size(layout: &dyn TypeLayout, ty: &Type) -> Result<usize, CodegenError> {
    layout
        .size_of(ty)
        .ok_or_else(|| CodegenError::TypeTooLarge { ty: ty.clone() })
}
