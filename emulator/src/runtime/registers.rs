use thiserror::Error;

use crate::constants::{Byte, REGISTER_COUNT, STACK_POINTER_INIT, STACK_POINTER_REGISTER};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// The register index was not in 0..8
    #[error("invalid register index {0}")]
    InvalidIndex(Byte),
}

/// The register file: eight general-purpose byte registers.
///
/// All registers start at zero, except r7 which holds the conventional
/// initial stack pointer. None of the implemented opcodes touch it, but the
/// convention is part of the architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    inner: [Byte; REGISTER_COUNT],
}

impl Default for Registers {
    fn default() -> Self {
        let mut inner = [0; REGISTER_COUNT];
        inner[STACK_POINTER_REGISTER] = STACK_POINTER_INIT;
        Self { inner }
    }
}

impl Registers {
    /// Get a register value by its index
    ///
    /// # Errors
    ///
    /// It fails if the index does not name one of the eight registers.
    pub fn get(&self, index: Byte) -> Result<Byte, RegisterError> {
        self.inner
            .get(usize::from(index))
            .copied()
            .ok_or(RegisterError::InvalidIndex(index))
    }

    /// Set a register value by its index
    ///
    /// # Errors
    ///
    /// It fails if the index does not name one of the eight registers.
    pub fn set(&mut self, index: Byte, value: Byte) -> Result<(), RegisterError> {
        let cell = self
            .inner
            .get_mut(usize::from(index))
            .ok_or(RegisterError::InvalidIndex(index))?;
        *cell = value;
        Ok(())
    }
}

impl std::fmt::Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (index, value) in self.inner.iter().enumerate() {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "%r{index} = {value:#04X}")?;
            first = false;
        }
        Ok(())
    }
}
